//! Per-session streaming state
//!
//! This module provides the stateful heart of the service:
//! - `SegmentStore`: ordered buffer of decoded audio segments
//! - `TriggerPolicy` / `RotationPolicy`: when to recognize, how to bound memory
//! - `SessionState` / `Phase`: lifecycle of one connection
//! - `SessionRegistry` / `SessionHandle`: shared id -> session mapping
//! - `SessionWorker`: the command handler driving one connection

mod policy;
mod registry;
mod state;
mod store;
mod worker;

pub use policy::{RotationPolicy, TriggerPolicy};
pub use registry::{RegistryError, SessionHandle, SessionRegistry};
pub use state::{Phase, SessionState};
pub use store::{Segment, SegmentStore};
pub use worker::{CommandOutcome, SessionWorker};
