#![cfg(unix)]

mod common;

use common::*;
use mastercheck_core::error::CheckError;
use mastercheck_core::media::TargetFormat;
use mastercheck_harness::scope::UnitScope;
use mastercheck_harness::synth::synthesize;

#[tokio::test]
async fn test_empty_output_is_failure_and_removed() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), EMPTY_TOOL);
    let path = dir.path().join("x.mp3");

    let err = synthesize(&tool, &path, 440, 1.0, &TargetFormat::mp3())
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::FixtureSynthesisFailed(_)));
    assert!(err.to_string().contains("empty file"));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_existing_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), WORKING_TOOL);
    let path = dir.path().join("x.mp3");
    std::fs::write(&path, b"stale contents from an earlier run").unwrap();

    synthesize(&tool, &path, 440, 1.0, &TargetFormat::mp3())
        .await
        .unwrap();

    assert_eq!(std::fs::read(&path).unwrap(), b"ID3fakeaudio");
}

#[tokio::test]
async fn test_scope_fixture_records_its_parameters() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), WORKING_TOOL);
    let scope = UnitScope::acquire("loading").unwrap();

    let fixture = scope
        .synthesize(&tool, "test_load", 880, 1.5, &TargetFormat::mp3())
        .await
        .unwrap();

    assert_eq!(fixture.frequency(), 880);
    assert_eq!(fixture.duration_secs(), 1.5);
    assert_eq!(fixture.format(), &TargetFormat::mp3());
    assert!(fixture.path().starts_with(scope.path()));
    assert_eq!(fixture.path().file_name().unwrap(), "test_load.mp3");
}

#[tokio::test]
async fn test_empty_fixture_leaves_nothing_in_scope() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), EMPTY_TOOL);
    let scope = UnitScope::acquire("processing").unwrap();

    let result = scope
        .synthesize(&tool, "target", 440, 1.0, &TargetFormat::mp3())
        .await;

    assert!(result.is_err());
    assert!(!scope.file("target.mp3").exists());
}
