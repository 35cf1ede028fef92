use std::fmt;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag, HexBytes};

enum_sim! {
    /// Why a link is deleted.
    pub struct DeleteLinkReason (u32) {
        /// Lost path.
        LOST_PATH = 0x0001_0000,
        /// Operator initiated termination.
        OPERATOR_TERMINATION = 0x0002_0000,
        /// Program initiated termination, e.g. link inactivity.
        PROGRAM_TERMINATION = 0x0003_0000,
        /// LLC protocol violation.
        PROTOCOL_VIOLATION = 0x0004_0000,
        /// Asymmetric link no longer needed.
        ASYMMETRIC_LINK = 0x0005_0000,
        /// Unknown link id.
        UNKNOWN_LINK_ID = 0x0010_0000,
    }
}

impl DeleteLinkReason {
    /// Description of the reason code.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::LOST_PATH => "Lost path",
            Self::OPERATOR_TERMINATION => "Operator initiated termination",
            Self::PROGRAM_TERMINATION => "Program initiated termination (link inactivity)",
            Self::PROTOCOL_VIOLATION => "LLC protocol violation",
            Self::ASYMMETRIC_LINK => "Asymmetric link no longer needed",
            Self::UNKNOWN_LINK_ID => "Unknown link ID (no link)",
            _ => "unknown",
        }
    }
}

code_display!(DeleteLinkReason);

/// LLC Delete Link, removing one or all links of a link group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeleteLink {
    base: RawMessage,
    res1: u8,
    reply: bool,
    all: bool,
    orderly: bool,
    res2: u8,
    link: u8,
    reason: DeleteLinkReason,
    res3: [u8; 35],
}

impl DeleteLink {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let link = cur.get_u8();
        let reason = DeleteLinkReason(cur.get_u32());
        let res3 = cur.take_array();
        debug_assert_eq!(cur.remaining(), 0);

        DeleteLink {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            all: flag(b, 0x40),
            orderly: flag(b, 0x20),
            res2: bits(b, 0x1f),
            link,
            reason,
            res3,
        }
    }

    /// Whether this is a reply.
    pub fn reply(&self) -> bool {
        self.reply
    }

    /// Whether all links of the link group are deleted.
    pub fn all(&self) -> bool {
        self.all
    }

    /// Whether the deletion is orderly.
    pub fn orderly(&self) -> bool {
        self.orderly
    }

    /// Link id.
    pub fn link(&self) -> u8 {
        self.link
    }

    /// Reason code.
    pub fn reason(&self) -> DeleteLinkReason {
        self.reason
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        self.base
            .fields(out, "LLC Delete Link", verbose)
            .reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .field("All", &self.all)
            .field("Orderly", &self.orderly)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Link", &self.link)
            .field("Reason Code", &self.reason)
            .reserved(&HexBytes(&self.res3))
            .finish()
    }
}

impl_message_render!(DeleteLink);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Render;

    fn delete_link() -> [u8; 44] {
        let mut buf = [0u8; 44];
        buf[0] = 0x04;
        buf[1] = 0x2c;
        buf[3] = 0x60;
        buf
    }

    #[test]
    fn delete_link_render() {
        let d = DeleteLink::parse(&delete_link());
        assert_eq!(
            d.to_compact(),
            "LLC Delete Link: Type: 4, Length: 44, Reply: false, \
             All: true, Orderly: true, Link: 0, \
             Reason Code: 0 (unknown)\n"
        );
        assert_eq!(
            d.to_verbose(),
            format!(
                "LLC Delete Link: Type: 4, Length: 44, Reserved: 0x0, \
                 Reply: false, All: true, Orderly: true, Reserved: 0x0, \
                 Link: 0, Reason Code: 0 (unknown), Reserved: 0x{}\n",
                "00".repeat(35)
            )
        );
        assert_eq!(
            d.hex(),
            "00000000  04 2c 00 60 00 00 00 00  00 00 00 00 00 00 00 00  |.,.`............|\n\
             00000010  00 00 00 00 00 00 00 00  00 00 00 00 00 00 00 00  |................|\n\
             00000020  00 00 00 00 00 00 00 00  00 00 00 00              |............|\n"
        );
    }

    #[test]
    fn delete_link_reason() {
        let mut buf = delete_link();
        buf[3] = 0x9f;
        buf[4] = 2;
        buf[5..9].copy_from_slice(&0x0010_0000u32.to_be_bytes());
        let d = DeleteLink::parse(&buf);
        assert_eq!(d.reply(), true);
        assert_eq!(d.all(), false);
        assert_eq!(d.orderly(), false);
        assert_eq!(d.link(), 2);
        assert_eq!(d.reason(), DeleteLinkReason::UNKNOWN_LINK_ID);
        assert!(d.to_verbose().contains(
            "Orderly: false, Reserved: 0x1f, Link: 2, \
             Reason Code: 1048576 (Unknown link ID (no link))"
        ));
    }

    #[test]
    fn reason_names() {
        assert_eq!(DeleteLinkReason(0x0001_0000).to_string(), "65536 (Lost path)");
        assert_eq!(
            DeleteLinkReason(0x0003_0000).to_string(),
            "196608 (Program initiated termination (link inactivity))"
        );
        assert_eq!(DeleteLinkReason(0x0005_0000).name(), "Asymmetric link no longer needed");
        assert_eq!(DeleteLinkReason(0x0006_0000).to_string(), "393216 (unknown)");
    }
}
