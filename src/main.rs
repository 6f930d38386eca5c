use eu_sanctions_cli::{cli, errors};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so CSV written to stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        error!(category = err.category(), "{err}");
        std::process::exit(1);
    }
}

fn run() -> errors::AppResult<()> {
    let rt =
        tokio::runtime::Runtime::new().map_err(|e| errors::AppError::IoError(e.to_string()))?;
    rt.block_on(cli::cli())
}
