use thiserror::Error;

/// CAS client error.
///
/// Application failures reported by the server in a response body are not
/// represented here; they travel inside the decoded packet.
#[derive(Debug, Error)]
pub enum Error {
    /// A value handed to an encoder does not fit the field it targets.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The parser was asked for more bytes than the buffer holds.
    #[error("decode underrun: needed {needed} bytes, {remaining} remaining")]
    Underrun { needed: usize, remaining: usize },

    /// Framing that cannot belong to a well-formed packet.
    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("connection closed")]
    ConnectionClosed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    General(String),
}

/// CAS client result type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::fmt::Error> for Error {
    fn from(e: std::fmt::Error) -> Self {
        Error::General(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl Error {
    /// True when the error means the byte stream can no longer be trusted and
    /// the connection has to be dropped.
    pub fn is_desynchronized(&self) -> bool {
        matches!(self, Error::Underrun { .. } | Error::Protocol(_) | Error::ConnectionClosed | Error::Io(_))
    }
}
