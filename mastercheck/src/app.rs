use mastercheck_core::config::Config;
use mastercheck_harness::Harness;
use mastercheck_harness::report::{header, render};
use tracing::info;

/// Runs every unit, prints the report and returns the process exit status.
pub async fn run(config: Config) -> u8 {
    let harness = Harness::with_default_pipeline(config);
    let format = harness.context().format.display_name();

    println!("{}", header(&format));
    info!(
        "Using codec tool at {}",
        harness.context().tool.program().display()
    );

    let report = harness.run().await;
    print!("{}", render(&report, &harness.guidance()));

    match report.exit_code() {
        0 => 0,
        _ => 1,
    }
}
