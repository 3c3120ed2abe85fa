use anyhow::Context as _;
use tracing_subscriber::{EnvFilter, fmt};

mod command;
mod util;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    command::run()
}

/// Logs go to stderr so that JSON on stdout stays parseable.
fn init_tracing() -> anyhow::Result<()> {
    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}
