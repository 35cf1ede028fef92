use std::fmt;

use super::RawMessage;

/// A payload that is not a known LLC or CDC message.
///
/// Only the bytes are kept. Both rendering modes print `Other Payload`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Other {
    base: RawMessage,
}

impl Other {
    pub(crate) fn parse(buf: &[u8]) -> Self {
        Other {
            base: RawMessage::other(buf),
        }
    }

    /// Length of the payload in bytes.
    #[inline]
    pub fn length(&self) -> usize {
        self.base.length()
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, _verbose: bool) -> fmt::Result {
        out.write_str("Other Payload\n")
    }
}

impl_message_render!(Other);
