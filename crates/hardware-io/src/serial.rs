//! Serial Transport
//!
//! Opens the character-oriented link the sequencer talks over. A real
//! serial device is driven through `tokio-serial` at the configured baud;
//! the reserved device name `stdio` maps the transport onto the process
//! stdin/stdout so the program can be driven from a plain terminal.

use crate::error::TransportError;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_serial::SerialPortBuilderExt;
use tracing::info;

/// Reserved device name selecting the stdin/stdout transport
pub const STDIO_DEVICE: &str = "stdio";

/// Boxed receive half of the transport
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;

/// Boxed transmit half of the transport
pub type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Device path (e.g. "/dev/ttyUSB0"), or "stdio"
    pub device: String,
    /// Baud rate for real serial devices
    pub baud: u32,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            device: STDIO_DEVICE.to_string(),
            baud: 115_200,
        }
    }
}

/// Open the configured transport and split it into receive and transmit halves
pub fn open_transport(
    settings: &SerialSettings,
) -> Result<(BoxReader, SerialTx<BoxWriter>), TransportError> {
    if settings.device == STDIO_DEVICE {
        info!("using stdin/stdout as the serial transport");
        let reader: BoxReader = Box::new(tokio::io::stdin());
        let writer: BoxWriter = Box::new(tokio::io::stdout());
        return Ok((reader, SerialTx::new(writer)));
    }

    info!(device = %settings.device, baud = settings.baud, "opening serial device");
    let stream = tokio_serial::new(&settings.device, settings.baud)
        .open_native_async()
        .map_err(|source| TransportError::Open {
            device: settings.device.clone(),
            source,
        })?;

    let (reader, writer) = tokio::io::split(stream);
    let reader: BoxReader = Box::new(reader);
    let writer: BoxWriter = Box::new(writer);
    Ok((reader, SerialTx::new(writer)))
}

/// Transmit wrapper over the write half of the transport.
///
/// Every call flushes, keeping the terminal interactive even for single
/// echoed keystrokes.
pub struct SerialTx<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> SerialTx<W> {
    /// Wrap a transmit half
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Transmit a single byte
    pub async fn write_byte(&mut self, byte: u8) -> Result<(), TransportError> {
        self.inner.write_all(&[byte]).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Transmit a string without a line terminator
    pub async fn write_str(&mut self, text: &str) -> Result<(), TransportError> {
        self.inner.write_all(text.as_bytes()).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Transmit a string followed by `\r\n`
    pub async fn write_line(&mut self, text: &str) -> Result<(), TransportError> {
        self.inner.write_all(text.as_bytes()).await?;
        self.inner.write_all(b"\r\n").await?;
        self.inner.flush().await?;
        Ok(())
    }
}
