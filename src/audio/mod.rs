pub mod clip;
pub mod transcode;

pub use clip::AudioClip;
pub use transcode::{DecodeError, MergeError, SymphoniaTranscoder, Transcoder};
