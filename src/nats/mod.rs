pub mod client;
pub mod messages;

pub use client::{BroadcastStore, NatsBroadcast};
pub use messages::TranscriptUpdate;
