use crate::transport::TransportError;
use thiserror::Error;

/// Errors surfaced by the crate.
///
/// Short or unknown reports are not errors; the decoder drops them.
/// Out-of-range sensitivities are clamped rather than rejected.
#[derive(Debug, Error)]
pub enum Error {
    /// No entry of the supported device table could be opened.
    #[error("no supported SpaceMouse device found")]
    NoDeviceFound,

    /// A [`Transport::read`](crate::Transport::read) call failed.
    ///
    /// The manager reports its own read failures as
    /// [`EventKind::DeviceError`](crate::EventKind::DeviceError) and never
    /// returns this; it exists so code driving a transport directly can use
    /// `?` on a read.
    #[error(transparent)]
    TransportRead(#[from] TransportError),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "hid")]
    #[error("hid error: {0}")]
    Hid(#[from] hidapi::HidError),
}

pub type Result<T> = std::result::Result<T, Error>;
