//! Capability probing of the external codec tool.

use crate::runner::TestUnit;
use crate::tool::CodecTool;
use crate::HarnessContext;
use mastercheck_core::error::{CheckError, Result};
use mastercheck_core::media::CapabilityReport;
use mastercheck_core::outcome::TestOutcome;
use std::collections::BTreeSet;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Runs the tool's version query, bounded by `timeout`.
#[instrument(skip_all, fields(tool = %tool.name()))]
pub async fn probe(tool: &CodecTool, timeout: Duration) -> Result<CapabilityReport> {
    let mut cmd = tool.command();
    cmd.arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let output = match tokio::time::timeout(timeout, cmd.output()).await {
        Err(_) => {
            return Err(CheckError::ToolTimeout {
                tool: tool.name().to_owned(),
                secs: timeout.as_secs(),
            });
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(CheckError::ToolNotFound(tool.name().to_owned()));
        }
        Ok(Err(e)) => {
            return Err(CheckError::ToolUnresponsive(format!("{}: {e}", tool.name())));
        }
        Ok(Ok(output)) => output,
    };

    if !output.status.success() {
        return Err(CheckError::ToolUnresponsive(format!(
            "{} exited with {}",
            tool.name(),
            output.status
        )));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.lines().next().unwrap_or_default().trim().to_owned();
    info!("{}", version);

    Ok(CapabilityReport {
        tool_present: true,
        version,
        encoders: parse_encoders(&stdout),
    })
}

/// Fails with `CapabilityMissing` unless `report` lists `encoder`.
pub fn require_encoder(report: &CapabilityReport, encoder: &str) -> Result<()> {
    if report.supports(encoder) {
        Ok(())
    } else {
        Err(CheckError::CapabilityMissing(encoder.to_owned()))
    }
}

/// Collects the `--enable-<name>` switches from the build configuration listing.
pub fn parse_encoders(version_output: &str) -> BTreeSet<String> {
    version_output
        .split_whitespace()
        .filter_map(|token| token.strip_prefix("--enable-"))
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Test unit named after the tool that checks presence and encoder support.
pub fn unit(ctx: Arc<HarnessContext>) -> TestUnit {
    let name = ctx.tool.name().to_owned();
    TestUnit::new(name.clone(), move || {
        let ctx = ctx.clone();
        let name = name.clone();
        async move {
            info!("Checking {} availability", ctx.tool.name());
            let encoder = &ctx.config.codec.encoder;
            let result = probe(&ctx.tool, ctx.config.codec.probe_timeout())
                .await
                .and_then(|report| require_encoder(&report, encoder).map(|()| report));

            match result {
                Ok(report) => {
                    info!(
                        "{} encoding support ({}) available",
                        ctx.format.display_name(),
                        encoder
                    );
                    TestOutcome::pass(name, format!("{} ({encoder} available)", report.version))
                }
                Err(e) => {
                    warn!("{}", e);
                    TestOutcome::fail(name, e.to_string())
                }
            }
        }
    })
}
