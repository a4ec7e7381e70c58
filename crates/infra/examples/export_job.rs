//! Example: instrumenting an export job
//!
//! Reads telemetry settings from the environment (or `opscope.toml`),
//! initialises logging and reports a few units of work in both usage modes.
//!
//! ```bash
//! LOG_LEVEL=debug STATSD_ON=yes cargo run -p opscope-infra --example export_job
//! ```
//!
//! With `STATSD_ON` set, watch the datagrams with `nc -ul 8125`.

use std::time::Duration;

use anyhow::{bail, Context};
use opscope_core::{decorate, EventContext};
use opscope_infra::{config, logging, TelemetryFactory};

fn parse_batch_size(raw: &str) -> anyhow::Result<usize> {
    raw.parse().with_context(|| format!("batch size {raw:?} is not a number"))
}

async fn upload(batch: usize) -> anyhow::Result<usize> {
    tokio::time::sleep(Duration::from_millis(15)).await;
    if batch == 0 {
        bail!("refusing to upload an empty batch");
    }
    Ok(batch)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = config::load()?;
    logging::init(&settings.log)?;

    let factory = TelemetryFactory::from_config(&settings);

    // Scoped block, errors handed back
    let export = factory.telemetry("jobs.export").label("run").build();
    let region = export.enter_with(EventContext::new().with("tenant", "acme"));
    std::thread::sleep(Duration::from_millis(10));
    region.finish();

    // Scoped block, errors only reported
    let lenient = factory.telemetry("jobs.export").reraise(false).build();
    let skipped = lenient.scope(|| parse_batch_size("ten"))?;
    tracing::info!(?skipped, "Malformed batch size was reported and skipped");

    // Decorated functions
    let parse_batch_size = decorate!(export, parse_batch_size);
    let size = parse_batch_size.call(("25",))?.unwrap_or_default();

    let upload = decorate!(export, upload, reraise = false);
    let uploaded = upload.call_async((size,)).await?;
    let rejected = upload.call_async((0,)).await?;
    tracing::info!(?uploaded, ?rejected, "Upload finished");

    Ok(())
}
