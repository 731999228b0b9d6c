//! Fixed-format textual report of one run.

use crate::runner::RunReport;
use mastercheck_core::outcome::AggregateStatus;
use std::fmt::Write;
use std::path::{Path, PathBuf};

const RULE: &str = "==================================================";

/// Context for the next-step text printed after a passing run.
#[derive(Debug, Clone)]
pub struct Guidance {
    pub interface_url: String,
    pub format_name: String,
    pub publish_dir: Option<PathBuf>,
}

pub fn header(format_name: &str) -> String {
    format!("mastercheck {format_name} support test\n{RULE}")
}

/// Per-unit status lines, the summary table, then guidance keyed on the aggregate.
pub fn render(report: &RunReport, guidance: &Guidance) -> String {
    let mut out = String::new();

    for outcome in &report.outcomes {
        let _ = writeln!(
            out,
            "{} {}: {}",
            outcome.status().marker(),
            outcome.name(),
            outcome.message()
        );
    }

    let _ = writeln!(out, "\nTest Summary\n{RULE}");
    for outcome in &report.outcomes {
        let _ = writeln!(out, "{:12} {}", capitalize(outcome.name()), outcome.status());
    }

    match report.aggregate() {
        AggregateStatus::Pass => write_guidance(&mut out, report, guidance),
        AggregateStatus::Fail => {
            let _ = writeln!(
                out,
                "\n⚠️  Some tests failed. Please check the error messages above."
            );
        }
    }

    out
}

fn write_guidance(out: &mut String, report: &RunReport, guidance: &Guidance) {
    let format = &guidance.format_name;
    let _ = writeln!(
        out,
        "\n🎉 All tests passed! {format} support is fully functional."
    );
    let _ = writeln!(out, "\nYou can now:");
    let _ = writeln!(
        out,
        "1. Upload {format} files directly to the web interface at {}",
        guidance.interface_url
    );
    let _ = writeln!(out, "2. Use {format} files through the library API");
    let _ = writeln!(
        out,
        "3. Process {format} files as both target and reference tracks"
    );

    if report.published.is_empty() {
        return;
    }
    match &guidance.publish_dir {
        Some(dir) => {
            let _ = writeln!(out, "\nSample files created in {}:", dir.display());
        }
        None => {
            let _ = writeln!(out, "\nSample files created:");
        }
    }
    for path in &report.published {
        let name = path
            .file_name()
            .map(Path::new)
            .unwrap_or(path.as_path());
        let _ = writeln!(out, "   - {}", name.display());
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mastercheck_core::outcome::TestOutcome;

    fn guidance() -> Guidance {
        Guidance {
            interface_url: "http://127.0.0.1:8360".into(),
            format_name: "MP3".into(),
            publish_dir: Some(PathBuf::from("/home/user/Downloads")),
        }
    }

    fn passing() -> RunReport {
        RunReport {
            outcomes: vec![
                TestOutcome::pass("ffmpeg", "ffmpeg version 6.1"),
                TestOutcome::pass("loading", "decoded"),
                TestOutcome::pass("processing", "written"),
            ],
            published: vec![
                PathBuf::from("/home/user/Downloads/mastercheck_test_target.mp3"),
                PathBuf::from("/home/user/Downloads/mastercheck_test_reference.mp3"),
            ],
        }
    }

    #[test]
    fn test_summary_table_uses_padded_capitalized_names() {
        let text = render(&passing(), &guidance());
        assert!(text.contains("Ffmpeg       ✅ PASS"));
        assert!(text.contains("Loading      ✅ PASS"));
        assert!(text.contains("Processing   ✅ PASS"));
    }

    #[test]
    fn test_pass_guidance_lists_interface_and_samples() {
        let text = render(&passing(), &guidance());
        assert!(text.contains("All tests passed! MP3 support is fully functional."));
        assert!(text.contains("web interface at http://127.0.0.1:8360"));
        assert!(text.contains("   - mastercheck_test_target.mp3"));
        assert!(text.contains("   - mastercheck_test_reference.mp3"));
        assert!(!text.contains("Some tests failed"));
    }

    #[test]
    fn test_failure_prints_warning_and_every_unit() {
        let mut report = passing();
        report.outcomes[0] = TestOutcome::fail("ffmpeg", "ffmpeg not found in PATH");
        let text = render(&report, &guidance());

        assert!(text.contains("❌ FAIL ffmpeg: ffmpeg not found in PATH"));
        assert!(text.contains("Ffmpeg       ❌ FAIL"));
        assert!(text.contains("Processing   ✅ PASS"));
        assert!(text.contains("Some tests failed. Please check the error messages above."));
        assert!(!text.contains("You can now"));
        assert!(!text.contains("mastercheck_test_target.mp3"));
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("loading"), "Loading");
        assert_eq!(capitalize(""), "");
    }
}
