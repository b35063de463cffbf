//! Lambda entry point for the ECS health monitor.

use ecs_monitor::handler;
use ecs_monitor::telemetry::{init_tracing, LogFormat};
use lambda_runtime::{run, service_fn, Error};

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing(LogFormat::Json, false);

    run(service_fn(handler::handle)).await
}
