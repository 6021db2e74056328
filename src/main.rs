use anyhow::{Context, Result};
use rankings::config::{Config, CONFIG_FILE};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) config: defaults, optionally overridden by rankings.yaml ──
    let cfg = Config::load_or_default(CONFIG_FILE).context("loading configuration")?;

    // ─── 3) fetch → extract → write ──────────────────────────────────
    match rankings::run(&cfg).await {
        Ok(summary) => {
            info!(rows = summary.rows, output = %summary.output.display(), "all done");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "run failed");
            Err(e.into())
        }
    }
}
