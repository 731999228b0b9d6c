//! Decode-only check: one fixture through the pipeline's load adapter.

use crate::runner::{TestUnit, panic_message};
use crate::scope::UnitScope;
use crate::validator::{check_duration, check_sample_rate};
use crate::HarnessContext;
use mastercheck_core::error::{CheckError, Result};
use mastercheck_core::outcome::TestOutcome;
use mastercheck_pipeline::DecodedAudio;
use std::sync::Arc;
use tracing::{error, info};

pub const UNIT_NAME: &str = "loading";

pub fn unit(ctx: Arc<HarnessContext>) -> TestUnit {
    TestUnit::new(UNIT_NAME, move || {
        let ctx = ctx.clone();
        async move {
            info!("Testing {} loading", ctx.format.display_name());
            let result = run(&ctx).await;
            if let Err(e) = &result {
                error!("{} loading failed: {}", ctx.format.display_name(), e);
            }
            TestOutcome::from_result(UNIT_NAME, result, |audio| {
                format!(
                    "decoded {} frames at {} Hz ({:.2}s)",
                    audio.frames(),
                    audio.sample_rate,
                    audio.duration_secs()
                )
            })
        }
    })
}

async fn run(ctx: &HarnessContext) -> Result<DecodedAudio> {
    let scope = UnitScope::acquire(UNIT_NAME)?;
    let fixtures = &ctx.config.fixtures;
    let fixture = scope
        .synthesize(
            &ctx.tool,
            "test_load",
            fixtures.target_frequency,
            fixtures.duration_secs,
            &ctx.format,
        )
        .await?;
    info!(
        "Created test {} file: {} ({} Hz)",
        fixture.format().display_name(),
        fixture.path().display(),
        fixture.frequency()
    );

    let pipeline = ctx.pipeline.clone();
    let path = fixture.path().to_path_buf();
    let scratch = scope.path().to_path_buf();
    let audio = tokio::task::spawn_blocking(move || pipeline.load(&path, "TARGET", &scratch))
        .await
        .map_err(|e| {
            let reason = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            };
            CheckError::DecodeAdapterFailure(format!("decode adapter panicked: {reason}"))
        })??;

    info!(
        "Loaded audio shape: ({}, {})",
        audio.frames(),
        audio.channels
    );
    info!("Sample rate: {} Hz", audio.sample_rate);
    info!("Duration: {:.2} seconds", audio.duration_secs());

    check_sample_rate(audio.sample_rate, ctx.pipeline.output_sample_rate())?;
    check_duration(
        audio.duration_secs(),
        fixture.duration_secs(),
        ctx.config.validation.duration_tolerance_secs,
    )?;
    Ok(audio)
}
