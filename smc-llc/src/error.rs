use std::error;
use std::fmt;

/// Result alias used by the fallible decoders.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// An error raised while decoding a packet.
///
/// Decoding is best effort, so the only hard failure is a buffer too short
/// to hold the headers it must contain. Callers drop such packets without
/// emitting output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodeError {
    kind: ErrorKind,
    msg: String,
}

impl DecodeError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// What was being decoded when the error occurred.
    pub fn msg(&self) -> &str {
        &self.msg
    }

    pub(crate) fn truncated<S: Into<String>>(needed: usize, got: usize, msg: S) -> Self {
        Self {
            kind: ErrorKind::TruncatedPacket { needed, got },
            msg: msg.into(),
        }
    }

    pub(crate) fn to_err<T>(self) -> Result<T> {
        Err(self)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::TruncatedPacket { needed, got } => write!(
                f,
                "truncated packet (need at least {} bytes, got {}): {}.",
                needed, got, self.msg
            ),
        }
    }
}

impl error::Error for DecodeError {}

/// Categories of [`DecodeError`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ErrorKind {
    /// The buffer is shorter than the minimum envelope.
    TruncatedPacket {
        /// Minimum number of bytes required.
        needed: usize,
        /// Number of bytes available.
        got: usize,
    },
}
