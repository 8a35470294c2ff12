use clap::Parser as _;
use tracing::{debug, info};

use dirtree::application::{Application, ApplicationError};
use dirtree::cli::Cli;

#[snafu::report]
fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    let summary = Application::run(cli_args)?;
    info!(
        "Executed {} command(s), {} failed",
        summary.executed, summary.failed
    );

    Ok(())
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_level_filter() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .without_time()
            .compact()
            .init();
    }
}
