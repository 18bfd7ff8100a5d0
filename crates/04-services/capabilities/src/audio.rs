use remoting_abi::{Error, Result};
use remoting_config::Config;

/// Audio track availability and the switches layered on it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AudioGate {
    track: bool,
    enabled: bool,
    microphone: bool,
}

impl AudioGate {
    /// A track exists unless the config disables the audio device.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.audio_enabled())
    }

    pub fn new(track: bool) -> Self {
        Self {
            track,
            enabled: track,
            microphone: false,
        }
    }

    pub fn has_track(&self) -> bool {
        self.track
    }

    pub fn require_track(&self) -> Result<()> {
        if self.track {
            Ok(())
        } else {
            Err(Error::AudioTrackNotInitialized)
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) -> Result<()> {
        self.require_track()?;
        self.enabled = enabled;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.track && self.enabled
    }

    /// Client: feeds the microphone into the outgoing track.
    pub fn enable_microphone_capture(&mut self) -> Result<()> {
        self.require_track()?;
        if !self.microphone {
            log::debug!("microphone capture enabled");
        }
        self.microphone = true;
        Ok(())
    }

    pub fn microphone_capture(&self) -> bool {
        self.microphone
    }
}
