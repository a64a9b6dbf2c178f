use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub stt: SttSettings,
    #[serde(default)]
    pub nats: NatsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Tuning knobs for the streaming transcription state machine.
#[derive(Debug, Clone, Deserialize)]
pub struct SttSettings {
    /// Minimum cumulative decoded bytes buffered before a recognition pass
    /// runs. A byte-count heuristic, not a duration guarantee; tune per
    /// capture chunk size.
    #[serde(default = "default_trigger_bytes")]
    pub trigger_bytes: usize,

    /// Maximum buffered segments per session; older segments are evicted
    /// after each successful recognition pass.
    #[serde(default = "default_max_segments")]
    pub max_segments: usize,

    /// NATS subject the recognizer service listens on (request/reply).
    #[serde(default = "default_request_subject")]
    pub request_subject: String,

    /// Deadline for a single recognition request, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Upper bound on recognition passes in flight across all sessions.
    /// Unset means unbounded.
    #[serde(default)]
    pub max_concurrent_passes: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NatsConfig {
    #[serde(default = "default_nats_url")]
    pub url: String,
}

fn default_service_name() -> String {
    "streamscribe".to_string()
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_trigger_bytes() -> usize {
    1000
}

fn default_max_segments() -> usize {
    8
}

fn default_request_subject() -> String {
    "stt.transcribe".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            trigger_bytes: default_trigger_bytes(),
            max_segments: default_max_segments(),
            request_subject: default_request_subject(),
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrent_passes: None,
        }
    }
}

impl Default for NatsConfig {
    fn default() -> Self {
        Self {
            url: default_nats_url(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file, layered under
    /// STREAMSCRIBE_-prefixed environment variables.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("STREAMSCRIBE").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
