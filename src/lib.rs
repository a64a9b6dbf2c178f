pub mod audio;
pub mod config;
pub mod http;
pub mod nats;
pub mod pipeline;
pub mod protocol;
pub mod session;
pub mod stt;

pub use audio::{AudioClip, DecodeError, MergeError, SymphoniaTranscoder, Transcoder};
pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{BroadcastStore, NatsBroadcast, TranscriptUpdate};
pub use pipeline::{join_spans, merge_transcribe, PipelineError};
pub use protocol::{ControlCommand, OutboundEvent};
pub use session::{
    CommandOutcome, Phase, RegistryError, RotationPolicy, Segment, SegmentStore, SessionHandle,
    SessionRegistry, SessionState, SessionWorker, TriggerPolicy,
};
pub use stt::{NatsRecognizer, RecognitionError, Recognizer, SttEngine, TextSpan};
