/// Test fixtures for pipeline validation
///
/// - **Reference patterns**: sine waves written as WAV through hound (always available)
/// - **Generator**: FFmpeg-based MP3 generator (tests skip when FFmpeg is missing)

pub mod generator;
pub mod reference;
