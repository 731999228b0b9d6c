// Audio processing pipeline under test
pub mod decoder;
pub mod loader;
pub mod mastering;
pub mod process;
pub mod resample;
pub mod writer;

pub use decoder::{DecodedAudio, SymphoniaDecoder};
pub use loader::Loader;
pub use mastering::{LevelMatch, Mastering};
pub use process::{MasteringPipeline, Pipeline};
pub use writer::{PcmSubtype, ResultSpec};
