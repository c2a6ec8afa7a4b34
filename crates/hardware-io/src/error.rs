//! Transport Error Types

use thiserror::Error;

/// Errors raised by the serial transport layer
#[derive(Debug, Error)]
pub enum TransportError {
    /// Serial device could not be opened
    #[error("failed to open serial device {device}: {source}")]
    Open {
        device: String,
        #[source]
        source: tokio_serial::Error,
    },

    /// Read or write on an open transport failed
    #[error("serial I/O error: {0}")]
    Io(#[from] std::io::Error),
}
