//! Full-workflow check: target and reference through the processing entry point.

use crate::runner::{TestUnit, panic_message};
use crate::scope::UnitScope;
use crate::validator::{artifact_size, check_sample_rate, inspect_artifact};
use crate::HarnessContext;
use mastercheck_core::error::{CheckError, Result};
use mastercheck_core::outcome::TestOutcome;
use mastercheck_pipeline::ResultSpec;
use std::sync::Arc;
use tracing::{error, info};

pub const UNIT_NAME: &str = "processing";

pub fn unit(ctx: Arc<HarnessContext>) -> TestUnit {
    TestUnit::new(UNIT_NAME, move || {
        let ctx = ctx.clone();
        async move {
            info!("Testing {} processing", ctx.format.display_name());
            let result = run(&ctx).await;
            if let Err(e) = &result {
                error!(error = ?e, "{} processing failed: {}", ctx.format.display_name(), e);
            }
            TestOutcome::from_result(UNIT_NAME, result, |size| {
                format!("result written ({} bytes)", group_thousands(size))
            })
        }
    })
}

async fn run(ctx: &HarnessContext) -> Result<u64> {
    let scope = UnitScope::acquire(UNIT_NAME)?;
    let fixtures = &ctx.config.fixtures;

    info!("Creating target {} file...", ctx.format.display_name());
    let target = scope
        .synthesize(
            &ctx.tool,
            "target",
            fixtures.target_frequency,
            fixtures.duration_secs,
            &ctx.format,
        )
        .await?;
    info!("   Target: {} ({} Hz)", target.path().display(), target.frequency());

    info!("Creating reference {} file...", ctx.format.display_name());
    let reference = scope
        .synthesize(
            &ctx.tool,
            "reference",
            fixtures.reference_frequency,
            fixtures.duration_secs,
            &ctx.format,
        )
        .await?;
    info!(
        "   Reference: {} ({} Hz)",
        reference.path().display(),
        reference.frequency()
    );

    let result_path = scope.file("result.wav");
    info!("Processing with pipeline...");

    let pipeline = ctx.pipeline.clone();
    let target_path = target.path().to_path_buf();
    let reference_path = reference.path().to_path_buf();
    let results = [ResultSpec::pcm16(result_path.clone())];
    tokio::task::spawn_blocking(move || pipeline.process(&target_path, &reference_path, &results))
        .await
        .map_err(|e| {
            let reason = if e.is_panic() {
                panic_message(e.into_panic())
            } else {
                e.to_string()
            };
            CheckError::PipelineProcessingFailure(format!("pipeline panicked: {reason}"))
        })??;

    let size = artifact_size(&result_path)?;
    info!("Result file created: {}", result_path.display());
    info!("File size: {} bytes", group_thousands(size));

    let produced = inspect_artifact(&result_path)?;
    check_sample_rate(produced.sample_rate, ctx.pipeline.output_sample_rate())?;
    Ok(size)
}

/// Formats `n` with comma thousands separators.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
