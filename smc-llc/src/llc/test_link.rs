use std::fmt;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag, HexBytes};
use crate::render::FieldList;

/// LLC Test Link, a keepalive echoed back by the peer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestLink {
    base: RawMessage,
    res1: u8,
    reply: bool,
    res2: u8,
    user_data: [u8; 16],
    res3: [u8; 24],
}

impl TestLink {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let user_data = cur.take_array();
        let res3 = cur.take_array();
        debug_assert_eq!(cur.remaining(), 0);

        TestLink {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            res2: bits(b, 0x7f),
            user_data,
            res3,
        }
    }

    /// Whether this is a reply.
    pub fn reply(&self) -> bool {
        self.reply
    }

    /// Opaque data returned unchanged in the reply.
    pub fn user_data(&self) -> &[u8; 16] {
        &self.user_data
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        // This line writes "Type 7" without a colon.
        FieldList::new(out, "LLC Test Link", verbose)
            .entry(&format_args!("Type {}", self.base.msg_type().raw()))
            .field("Length", &self.base.length())
            .reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("User Data", &HexBytes(&self.user_data))
            .reserved(&HexBytes(&self.res3))
            .finish()
    }
}

impl_message_render!(TestLink);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Render;

    fn test_link() -> [u8; 44] {
        let mut buf = [0u8; 44];
        buf[0] = 0x07;
        buf[1] = 0x2c;
        buf[3] = 0x80;
        buf
    }

    #[test]
    fn test_link_render() {
        let t = TestLink::parse(&test_link());
        assert_eq!(t.reply(), true);
        assert_eq!(
            t.to_compact(),
            "LLC Test Link: Type 7, Length: 44, Reply: true, \
             User Data: 0x00000000000000000000000000000000\n"
        );
        assert_eq!(
            t.to_verbose(),
            format!(
                "LLC Test Link: Type 7, Length: 44, Reserved: 0x0, \
                 Reply: true, Reserved: 0x0, \
                 User Data: 0x00000000000000000000000000000000, \
                 Reserved: 0x{}\n",
                "00".repeat(24)
            )
        );
    }

    #[test]
    fn test_link_user_data() {
        let mut buf = test_link();
        for (i, b) in buf[4..20].iter_mut().enumerate() {
            *b = i as u8;
        }
        let t = TestLink::parse(&buf);
        assert_eq!(t.user_data()[15], 15);
        assert!(t
            .to_compact()
            .ends_with("User Data: 0x000102030405060708090a0b0c0d0e0f\n"));
    }
}
