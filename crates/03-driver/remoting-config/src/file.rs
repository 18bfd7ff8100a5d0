//! On-disk JSON shape and its conversion to [`Config`].

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    AudioDevice, Config, Decoder, DiagnosticOptions, Encoder, IceServer, RenderConfig, Role,
    SignalingConfig, VideoSource, FALLBACK_STUN_URL,
};

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    video_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    encoder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    decoder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ice_servers: Option<Vec<IceServerFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dnssd_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    diagnostic_options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audio_device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    signaling: Option<SignalingFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    render_config: Option<RenderFile>,
}

#[derive(Debug, Deserialize, Serialize)]
struct IceServerFile {
    url: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    credential: String,
}

#[derive(Debug, Deserialize, Serialize)]
struct SignalingFile {
    #[serde(default)]
    ip: Option<String>,
    #[serde(default)]
    port: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderFile {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    num_views: Option<u32>,
    #[serde(default)]
    bandwidth: Option<u32>,
    #[serde(default)]
    framerate: Option<u32>,
}

pub(crate) fn parse(text: &str) -> ConfigResult<Config> {
    let raw: ConfigFile = serde_json::from_str(text)?;

    let role = match raw.role.as_deref() {
        Some(value) => {
            Role::parse(value).ok_or_else(|| ConfigError::Role(Some(value.to_owned())))?
        }
        None => return Err(ConfigError::Role(None)),
    };

    let video_source = choice(
        raw.video_source.as_deref(),
        VideoSource::parse,
        ConfigError::VideoSource,
    )?;
    let encoder = choice(raw.encoder.as_deref(), Encoder::parse, ConfigError::Encoder)?;
    let decoder = choice(raw.decoder.as_deref(), Decoder::parse, ConfigError::Decoder)?;

    let signaling = parse_signaling(raw.signaling)?;

    let ice_servers = match raw.ice_servers {
        Some(list) if !list.is_empty() => list
            .into_iter()
            .map(|s| IceServer {
                url: s.url,
                username: s.username,
                credential: s.credential,
            })
            .collect(),
        _ => {
            log::warn!("no ice servers configured, falling back to {FALLBACK_STUN_URL}");
            vec![IceServer::stun(FALLBACK_STUN_URL)]
        }
    };

    let diagnostics = match raw.diagnostic_options {
        Some(names) => names.iter().fold(DiagnosticOptions::DISABLED, |acc, name| {
            match DiagnosticOptions::parse_name(name) {
                Some(flag) => acc.with(flag),
                None => {
                    log::warn!("ignoring unknown diagnostic option {name:?}");
                    acc
                }
            }
        }),
        None => DiagnosticOptions::DISABLED,
    };

    let audio_device = match raw.audio_device.as_deref() {
        Some(value) => AudioDevice::parse(value).unwrap_or_else(|| {
            log::warn!("unknown audio device {value:?}, using default");
            AudioDevice::Default
        }),
        None => {
            log::warn!("audio device not set, using default");
            AudioDevice::Default
        }
    };

    let config = Config {
        role,
        video_source,
        encoder,
        decoder,
        ice_servers,
        dnssd_name: raw.dnssd_name.unwrap_or_default(),
        diagnostics,
        audio_device,
        signaling,
        render: render_settings(raw.render_config),
    };
    config.validate()?;
    Ok(config)
}

pub(crate) fn render(config: &Config) -> ConfigResult<String> {
    let raw = ConfigFile {
        role: Some(config.role.as_str().to_owned()),
        video_source: config.video_source.map(|v| v.as_str().to_owned()),
        encoder: config.encoder.map(|v| v.as_str().to_owned()),
        decoder: config.decoder.map(|v| v.as_str().to_owned()),
        ice_servers: Some(
            config
                .ice_servers
                .iter()
                .map(|s| IceServerFile {
                    url: s.url.clone(),
                    username: s.username.clone(),
                    credential: s.credential.clone(),
                })
                .collect(),
        ),
        dnssd_name: Some(config.dnssd_name.clone()),
        diagnostic_options: Some(
            config
                .diagnostics
                .names()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        ),
        audio_device: Some(config.audio_device.as_str().to_owned()),
        signaling: Some(SignalingFile {
            ip: Some(config.signaling.ip.to_string()),
            port: Some(u64::from(config.signaling.port)),
        }),
        render_config: Some(RenderFile {
            name: Some(config.render.name.clone()),
            width: Some(config.render.width),
            height: Some(config.render.height),
            num_views: Some(config.render.num_views),
            bandwidth: Some(config.render.bandwidth),
            framerate: Some(config.render.framerate),
        }),
    };
    Ok(serde_json::to_string_pretty(&raw)?)
}

/// Absent stays `None`; present but unrecognised fails with `err`.
fn choice<T>(
    value: Option<&str>,
    parse: fn(&str) -> Option<T>,
    err: fn(Option<String>) -> ConfigError,
) -> ConfigResult<Option<T>> {
    match value {
        None => Ok(None),
        Some(text) => parse(text)
            .map(Some)
            .ok_or_else(|| err(Some(text.to_owned()))),
    }
}

fn parse_signaling(raw: Option<SignalingFile>) -> ConfigResult<SignalingConfig> {
    let raw = raw.ok_or(ConfigError::SignalingMissing)?;
    let ip = match raw.ip {
        Some(text) => text
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::SignalingIp(Some(text.clone())))?,
        None => return Err(ConfigError::SignalingIp(None)),
    };
    let port = match raw.port {
        Some(port @ 1..=0xFFFF) => port as u16,
        other => return Err(ConfigError::SignalingPort(other)),
    };
    Ok(SignalingConfig { ip, port })
}

fn render_settings(raw: Option<RenderFile>) -> RenderConfig {
    let defaults = RenderConfig::default();
    let Some(raw) = raw else {
        log::warn!("render-config missing, using {} defaults", defaults.name);
        return defaults;
    };
    if raw.name.is_none()
        || raw.width.is_none()
        || raw.height.is_none()
        || raw.num_views.is_none()
        || raw.bandwidth.is_none()
        || raw.framerate.is_none()
    {
        log::warn!(
            "render-config incomplete, filling gaps from {} defaults",
            defaults.name
        );
    }
    RenderConfig {
        name: raw.name.unwrap_or(defaults.name),
        width: raw.width.unwrap_or(defaults.width),
        height: raw.height.unwrap_or(defaults.height),
        num_views: raw.num_views.unwrap_or(defaults.num_views),
        bandwidth: raw.bandwidth.unwrap_or(defaults.bandwidth),
        framerate: raw.framerate.unwrap_or(defaults.framerate),
    }
}
