use thiserror::Error;

use crate::client::ConfigError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The client configuration was rejected before connecting.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The channel to the server could not be established.
    #[error("failed to connect: {0}")]
    Connect(#[from] tonic::transport::Error),

    /// The server (or the transport) failed the call.
    #[error("rpc failed: {0}")]
    Status(#[from] tonic::Status),

    /// Data was sent after the outbound half of the stream was finished.
    #[error("stream already closed for sending")]
    StreamClosed,

    #[error("audio i/o failed: {0}")]
    Io(#[from] std::io::Error),
}
