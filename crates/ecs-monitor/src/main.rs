//! ECS monitor CLI - run one health check pass from a shell.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use ecs_monitor::config::{ENV_CLUSTER, ENV_METRICS_REGION, ENV_NAMESPACE, ENV_REGION};
use ecs_monitor::telemetry::{init_tracing, LogFormat};
use ecs_monitor::{handler, DryRunSink, EcsClient, HealthMonitor, MonitorConfig, MonitorReport};

/// ECS Monitor - publish ECS cluster and service health to CloudWatch.
#[derive(Parser)]
#[command(name = "ecs-monitor")]
#[command(about = "Poll ECS cluster and service health and publish CloudWatch metrics")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single health check pass
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Cluster to poll
    #[arg(long, env = ENV_CLUSTER)]
    cluster: Option<String>,

    /// Region of the ECS API
    #[arg(long, env = ENV_REGION)]
    region: Option<String>,

    /// Region of the CloudWatch API (defaults to the ambient AWS region)
    #[arg(long, env = ENV_METRICS_REGION)]
    metrics_region: Option<String>,

    /// CloudWatch namespace
    #[arg(long, env = ENV_NAMESPACE)]
    namespace: Option<String>,

    /// Log data points instead of publishing them
    #[arg(long)]
    dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

/// Flag value, or `None` when unset or blank.
fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl RunArgs {
    /// Environment defaults with non-blank flags layered on top.
    fn config(&self) -> MonitorConfig {
        let mut config = MonitorConfig::from_env();
        if let Some(cluster) = non_blank(self.cluster.as_ref()) {
            config = config.with_cluster(cluster);
        }
        if let Some(region) = non_blank(self.region.as_ref()) {
            config = config.with_region(region);
        }
        if let Some(region) = non_blank(self.metrics_region.as_ref()) {
            config = config.with_metrics_region(region);
        }
        if let Some(namespace) = non_blank(self.namespace.as_ref()) {
            config = config.with_namespace(namespace);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(LogFormat::Pretty, cli.verbose);

    match cli.command {
        Commands::Run(args) => run(&args).await,
    }
}

async fn run(args: &RunArgs) -> Result<()> {
    let config = args.config();

    let report = if args.dry_run {
        config.validate()?;
        let sdk_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let api = EcsClient::from_sdk_config(&sdk_config, &config.region);
        HealthMonitor::new(api, DryRunSink::new(), config)
            .run()
            .await
            .context("Health check failed")?
    } else {
        handler::run_once(config)
            .await
            .context("Health check failed")?
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.to_json()?)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &MonitorReport) {
    println!("Cluster {}: {}", report.cluster.name, report.cluster.state);
    for service in &report.services {
        println!(
            "  {:<40} {} running",
            service.name, service.running_task_count
        );
    }
    println!(
        "{} healthy, {} without running tasks, {} data points",
        report.healthy_services(),
        report.unhealthy_services(),
        report.datapoints.len()
    );
}
