#![allow(missing_docs)]
//! Capability negotiation for QR detection, audio and statistics.

mod audio;
mod qr;
mod stats;

pub use audio::AudioGate;
pub use qr::QrGate;
pub use stats::StatsCollector;
