//! Config file loading tests.
//! Exercises the JSON schema, fallbacks and the error code each failure maps to.

use std::io::Write;
use std::net::{IpAddr, Ipv4Addr};

use remoting_abi::Error;
use remoting_config::{
    AudioDevice, Config, Decoder, DiagnosticOptions, Encoder, RenderConfig, Role, VideoSource,
    DEFAULT_CONFIG_FILE, FALLBACK_STUN_URL,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(DEFAULT_CONFIG_FILE);
    let mut file = std::fs::File::create(&path).expect("create config");
    file.write_all(body.as_bytes()).expect("write config");
    path
}

const FULL_SERVER: &str = r#"{
  "role": "server",
  "video-source": "d3d11",
  "encoder": "h264-uwp",
  "ice-servers": [{ "url": "stun:example.org:3478", "username": "u", "credential": "c" }],
  "dnssd-name": "render-box",
  "diagnostic-options": ["EnableTracing", "EnableStatsCollector"],
  "audio-device": "disabled",
  "signaling": { "ip": "127.0.0.1", "port": 8800 },
  "render-config": { "name": "Custom", "width": 1920, "height": 1080,
                     "numViews": 1, "bandwidth": 20000, "framerate": 30 }
}"#;

/// A complete server file loads every field as written.
#[test]
fn full_server_file_loads() {
    init_logging();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(&dir, FULL_SERVER);

    let config = Config::load(&path).expect("load");
    assert_eq!(config.role, Role::Server);
    assert_eq!(config.video_source, Some(VideoSource::D3d11));
    assert_eq!(config.encoder, Some(Encoder::H264Uwp));
    assert_eq!(config.decoder, None);
    assert_eq!(config.ice_servers.len(), 1);
    assert_eq!(config.ice_servers[0].url, "stun:example.org:3478");
    assert_eq!(config.ice_servers[0].credential, "c");
    assert_eq!(config.dnssd_name, "render-box");
    assert!(config.tracing_enabled());
    assert!(config.stats_enabled());
    assert!(!config
        .diagnostics
        .contains(DiagnosticOptions::ENABLE_EVENT_LOG));
    assert_eq!(config.audio_device, AudioDevice::Disabled);
    assert!(!config.audio_enabled());
    assert_eq!(config.signaling.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.signaling.port, 8800);
    assert_eq!(config.render.width, 1920);
    assert_eq!(config.render.num_views, 1);
}

/// Optional sections fall back to the documented defaults.
#[test]
fn minimal_client_file_uses_fallbacks() {
    init_logging();
    let config = Config::from_json_str(
        r#"{ "role": "Client", "decoder": "H264_UWP",
             "signaling": { "ip": "0.0.0.0", "port": 9999 } }"#,
    )
    .expect("parse");

    assert_eq!(config.role, Role::Client);
    assert_eq!(config.decoder, Some(Decoder::H264Uwp));
    assert_eq!(config.ice_servers.len(), 1);
    assert_eq!(config.ice_servers[0].url, FALLBACK_STUN_URL);
    assert_eq!(config.diagnostics, DiagnosticOptions::DISABLED);
    assert_eq!(config.audio_device, AudioDevice::Default);
    assert_eq!(config.render, RenderConfig::default());
    assert_eq!(config.render.height, 936);
}

/// Partial render sections keep the given values and fill the rest.
#[test]
fn partial_render_config_fills_gaps() {
    let config = Config::from_json_str(
        r#"{ "role": "client", "decoder": "builtin",
             "signaling": { "ip": "::1", "port": 1 },
             "render-config": { "width": 800 } }"#,
    )
    .expect("parse");
    assert_eq!(config.render.width, 800);
    assert_eq!(config.render.height, 936);
    assert_eq!(config.render.framerate, 60);
    assert_eq!(config.signaling.ip, "::1".parse::<IpAddr>().unwrap());
}

fn code_for(body: &str) -> Error {
    Config::from_json_str(body).unwrap_err().code()
}

/// Each malformed file reports its boundary code.
#[test]
fn failures_map_to_boundary_codes() {
    init_logging();
    assert_eq!(code_for("{ not json"), Error::ConfigParse);
    assert_eq!(code_for(r#"{ "role": 7 }"#), Error::ConfigParse);
    assert_eq!(
        code_for(r#"{ "signaling": { "ip": "0.0.0.0", "port": 1 } }"#),
        Error::ConfigUnsupportedOrMissingRole
    );
    assert_eq!(
        code_for(r#"{ "role": "observer" }"#),
        Error::ConfigUnsupportedOrMissingRole
    );
    assert_eq!(
        code_for(
            r#"{ "role": "server", "video-source": "d3d11",
                 "signaling": { "ip": "0.0.0.0", "port": 1 } }"#
        ),
        Error::ConfigUnsupportedOrMissingEncoder
    );
    assert_eq!(
        code_for(
            r#"{ "role": "server", "encoder": "vp9", "video-source": "d3d11",
                 "signaling": { "ip": "0.0.0.0", "port": 1 } }"#
        ),
        Error::ConfigUnsupportedOrMissingEncoder
    );
    assert_eq!(
        code_for(
            r#"{ "role": "server", "encoder": "builtin",
                 "signaling": { "ip": "0.0.0.0", "port": 1 } }"#
        ),
        Error::ConfigUnsupportedOrMissingVideoSource
    );
    assert_eq!(
        code_for(r#"{ "role": "client", "signaling": { "ip": "0.0.0.0", "port": 1 } }"#),
        Error::ConfigUnsupportedOrMissingDecoder
    );
    assert_eq!(
        code_for(r#"{ "role": "client", "decoder": "builtin" }"#),
        Error::ConfigSignalingInvalidOrMissing
    );
    assert_eq!(
        code_for(
            r#"{ "role": "client", "decoder": "builtin",
                 "signaling": { "ip": "not-an-ip", "port": 1 } }"#
        ),
        Error::ConfigSignalingIpInvalidOrMissing
    );
    assert_eq!(
        code_for(
            r#"{ "role": "client", "decoder": "builtin",
                 "signaling": { "ip": "0.0.0.0", "port": 0 } }"#
        ),
        Error::ConfigSignalingPortInvalidOrMissing
    );
    assert_eq!(
        code_for(
            r#"{ "role": "client", "decoder": "builtin",
                 "signaling": { "ip": "0.0.0.0", "port": 70000 } }"#
        ),
        Error::ConfigSignalingPortInvalidOrMissing
    );
}

/// A missing file reports `FileOpen`.
#[test]
fn missing_file_reports_file_open() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = Config::load(dir.path().join("absent.json")).unwrap_err();
    assert_eq!(Error::from(err), Error::FileOpen);
}

/// Writing a config out and loading it back yields the same value.
#[test]
fn written_config_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let original = Config::server()
        .with_diagnostics(DiagnosticOptions::ENABLE_STATS_COLLECTOR)
        .with_audio_device(AudioDevice::Disabled);
    let text = original.to_json_string().expect("render");
    assert!(text.contains("\"video-source\": \"d3d11\""));
    assert!(text.contains("\"numViews\": 2"));

    let path = write_config(&dir, &text);
    assert_eq!(Config::load(&path).expect("load"), original);
}
