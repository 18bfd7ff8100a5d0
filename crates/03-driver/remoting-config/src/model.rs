use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::file;

/// File name looked up when no explicit path is given.
pub const DEFAULT_CONFIG_FILE: &str = "remoting-config.json";
/// ICE server used when the config lists none.
pub const FALLBACK_STUN_URL: &str = "stun:stun.l.google.com:19302";

/// Lowercases and folds `_` into `-` so `H264_UWP` reads as `h264-uwp`.
pub(crate) fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('_', "-")
}

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Option<Self> {
                match normalize(value).as_str() {
                    $($text => Some($name::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

choice!(Role {
    Server => "server",
    Client => "client",
});

choice!(VideoSource {
    None => "none",
    D3d11 => "d3d11",
    Webcam => "webcam",
});

choice!(Encoder {
    Builtin => "builtin",
    H264Uwp => "h264-uwp",
});

choice!(Decoder {
    Builtin => "builtin",
    H264Uwp => "h264-uwp",
});

choice!(
    /// `Disabled` means the session has no audio track at all.
    AudioDevice {
        Default => "default",
        Disabled => "disabled",
    }
);

/// Diagnostic feature bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct DiagnosticOptions(u32);

impl DiagnosticOptions {
    pub const DISABLED: DiagnosticOptions = DiagnosticOptions(0);
    pub const ENABLE_TRACING: DiagnosticOptions = DiagnosticOptions(1 << 0);
    pub const ENABLE_EVENT_LOG: DiagnosticOptions = DiagnosticOptions(1 << 1);
    pub const ENABLE_STATS_COLLECTOR: DiagnosticOptions = DiagnosticOptions(1 << 2);

    const NAMED: [(DiagnosticOptions, &'static str); 3] = [
        (Self::ENABLE_TRACING, "EnableTracing"),
        (Self::ENABLE_EVENT_LOG, "EnableEventLog"),
        (Self::ENABLE_STATS_COLLECTOR, "EnableStatsCollector"),
    ];

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & 0b111)
    }

    pub const fn contains(self, other: DiagnosticOptions) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn with(self, other: DiagnosticOptions) -> Self {
        Self(self.0 | other.0)
    }

    /// Resolves one option name; `Disabled` resolves to no bits.
    pub fn parse_name(name: &str) -> Option<Self> {
        let wanted = normalize(name);
        if wanted == "disabled" {
            return Some(Self::DISABLED);
        }
        Self::NAMED
            .iter()
            .find(|(_, text)| normalize(text) == wanted)
            .map(|(flag, _)| *flag)
    }

    pub fn names(self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, text)| *text)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IceServer {
    pub url: String,
    pub username: String,
    pub credential: String,
}

impl IceServer {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: String::new(),
            credential: String::new(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignalingConfig {
    pub ip: IpAddr,
    pub port: u16,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 9999,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderConfig {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub num_views: u32,
    /// Encoder bitrate in kbit/s.
    pub bandwidth: u32,
    pub framerate: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            name: "HoloLens2".to_owned(),
            width: 1440,
            height: 936,
            num_views: 2,
            bandwidth: 36_000,
            framerate: 60,
        }
    }
}

/// Validated configuration of one peer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub role: Role,
    pub video_source: Option<VideoSource>,
    pub encoder: Option<Encoder>,
    pub decoder: Option<Decoder>,
    pub ice_servers: Vec<IceServer>,
    pub dnssd_name: String,
    pub diagnostics: DiagnosticOptions,
    pub audio_device: AudioDevice,
    pub signaling: SignalingConfig,
    pub render: RenderConfig,
}

impl Config {
    /// Server config with the default D3D11 source and UWP encoder.
    pub fn server() -> Self {
        Self {
            video_source: Some(VideoSource::D3d11),
            encoder: Some(Encoder::H264Uwp),
            ..Self::base(Role::Server)
        }
    }

    /// Client config with the default UWP decoder.
    pub fn client() -> Self {
        Self {
            decoder: Some(Decoder::H264Uwp),
            ..Self::base(Role::Client)
        }
    }

    fn base(role: Role) -> Self {
        Self {
            role,
            video_source: None,
            encoder: None,
            decoder: None,
            ice_servers: vec![IceServer::stun(FALLBACK_STUN_URL)],
            dnssd_name: String::new(),
            diagnostics: DiagnosticOptions::DISABLED,
            audio_device: AudioDevice::Default,
            signaling: SignalingConfig::default(),
            render: RenderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: DiagnosticOptions) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    #[must_use]
    pub fn with_audio_device(mut self, audio_device: AudioDevice) -> Self {
        self.audio_device = audio_device;
        self
    }

    /// Reads and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::FileOpen {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading remoting config from {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        file::parse(text)
    }

    /// Serialises the config in the file format [`Config::load`] reads.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        file::render(self)
    }

    /// Checks the fields the role requires are present.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.role {
            Role::Server => {
                if self.encoder.is_none() {
                    return Err(ConfigError::Encoder(None));
                }
                if self.video_source.is_none() {
                    return Err(ConfigError::VideoSource(None));
                }
            }
            Role::Client => {
                if self.decoder.is_none() {
                    return Err(ConfigError::Decoder(None));
                }
            }
        }
        if self.signaling.port == 0 {
            return Err(ConfigError::SignalingPort(Some(0)));
        }
        Ok(())
    }

    pub fn stats_enabled(&self) -> bool {
        self.diagnostics
            .contains(DiagnosticOptions::ENABLE_STATS_COLLECTOR)
    }

    pub fn tracing_enabled(&self) -> bool {
        self.diagnostics.contains(DiagnosticOptions::ENABLE_TRACING)
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_device != AudioDevice::Disabled
    }
}
