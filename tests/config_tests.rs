// Tests for configuration defaults and loading.

use streamscribe::Config;

#[test]
fn test_default_settings_match_documented_values() {
    let cfg = Config::default();

    assert_eq!(cfg.service.name, "streamscribe");
    assert_eq!(cfg.service.http.bind, "0.0.0.0");
    assert_eq!(cfg.service.http.port, 8080);

    assert_eq!(cfg.stt.trigger_bytes, 1000);
    assert_eq!(cfg.stt.max_segments, 8);
    assert_eq!(cfg.stt.request_subject, "stt.transcribe");
    assert_eq!(cfg.stt.request_timeout_secs, 30);
    assert_eq!(cfg.stt.max_concurrent_passes, None);

    assert_eq!(cfg.nats.url, "nats://localhost:4222");
}

#[test]
fn test_load_without_config_file_falls_back_to_defaults() {
    let cfg = Config::load("does/not/exist").unwrap();
    assert_eq!(cfg.stt.trigger_bytes, 1000);
    assert_eq!(cfg.stt.max_segments, 8);
}
