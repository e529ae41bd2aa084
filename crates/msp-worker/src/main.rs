mod config;
mod error;
mod protocol;
mod queue;
mod worker;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

/// Mission-supply optimization worker: consumes requests from the input
/// queue, solves the weekly recycling/substitution schedule, publishes
/// responses to the output queue.
#[derive(Debug, Parser)]
#[command(name = "msp-worker")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Overrides RUST_LOG.
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Process a single message then exit, instead of running forever.
    #[arg(long)]
    once: bool,
}

fn main() {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let config = match config::Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "invalid configuration, exiting");
            std::process::exit(1);
        }
    };

    info!(
        host = %config.rabbitmq_host,
        input_queue = %config.input_queue,
        output_queue = %config.output_queue,
        "starting msp-worker"
    );

    match worker::run(&config, cli.once) {
        Ok(()) => {
            info!("worker shut down cleanly");
        }
        Err(err) => {
            error!(error = %err, "worker exited with an error");
            std::process::exit(1);
        }
    }
}
