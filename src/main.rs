//! indexpush - main entry point
//!
//! Configuration comes from an optional `.env` file, the file named by
//! `INDEXPUSH_CONFIG` and the process environment. There are no flags.

use std::sync::Arc;

use anyhow::Context;
use indexpush::Pipeline;
use indexpush_config::{validate_config, ConfigLoader};
use indexpush_telemetry::{init_tracing, ErrorContext, RunSpan};
use indexpush_transport::ReqwestTransport;
use tracing::{info, Instrument};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal
    let _ = dotenvy::dotenv();

    let config = ConfigLoader::from_env().context("failed to load configuration")?;
    init_tracing(&config.telemetry)?;

    let transport = Arc::new(ReqwestTransport::with_timeout(config.feed.request_timeout())?);
    let pipeline = Pipeline::new(config, transport);

    let run = RunSpan::new(pipeline.config().feed.rss_url.clone());
    let run_id = run.run_id;

    async {
        validate_config(pipeline.config())
            .with_run_id(run_id)
            .context("invalid configuration")?;

        info!("Starting indexpush run");

        match pipeline.run().await.with_run_id(run_id)? {
            Some(report) => info!(outcomes = report.len(), "Run finished"),
            None => info!("Run finished without submissions"),
        }

        Ok::<(), anyhow::Error>(())
    }
    .instrument(run.span())
    .await
}
