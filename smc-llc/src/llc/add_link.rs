use std::fmt;
use std::net::Ipv6Addr;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::ether::MacAddr;
use crate::fields::{bits, canonical_ip, flag, HexBytes};

enum_sim! {
    /// Reason code of a rejected Add Link request.
    pub struct AddLinkReason (u8) {
        /// No alternate path available.
        NO_ALTERNATE_PATH = 1,
        /// Invalid MTU value specified.
        INVALID_MTU = 2,
    }
}

impl AddLinkReason {
    /// Description of the reason code.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::NO_ALTERNATE_PATH => "no alternate path available",
            Self::INVALID_MTU => "invalid MTU value specified",
            _ => "unknown",
        }
    }
}

code_display!(AddLinkReason);

enum_sim! {
    /// Compressed path MTU of a queue pair.
    pub struct QpMtu (u8) {
        /// 256 bytes.
        MTU_256 = 1,
        /// 512 bytes.
        MTU_512 = 2,
        /// 1024 bytes.
        MTU_1024 = 3,
        /// 2048 bytes.
        MTU_2048 = 4,
        /// 4096 bytes.
        MTU_4096 = 5,
    }
}

impl QpMtu {
    /// The MTU in bytes, `reserved` for unassigned codes.
    pub fn name(&self) -> &'static str {
        match *self {
            Self::MTU_256 => "256",
            Self::MTU_512 => "512",
            Self::MTU_1024 => "1024",
            Self::MTU_2048 => "2048",
            Self::MTU_4096 => "4096",
            _ => "reserved",
        }
    }
}

code_display!(QpMtu);

/// LLC Add Link, used to add a link to an existing link group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddLink {
    base: RawMessage,
    res1: u8,
    reason: AddLinkReason,
    reply: bool,
    reject: bool,
    res2: u8,
    sender_mac: MacAddr,
    // Present in the Linux implementation, absent from RFC 7609.
    res3: [u8; 2],
    sender_gid: Ipv6Addr,
    sender_qp: u32,
    link: u8,
    res4: u8,
    mtu: QpMtu,
    psn: u32,
    res5: [u8; 8],
}

impl AddLink {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let b = cur.get_u8();
        let (res1, reason) = (bits(b, 0xf0), AddLinkReason(bits(b, 0x0f)));
        let b = cur.get_u8();
        let (reply, reject, res2) = (flag(b, 0x80), flag(b, 0x40), bits(b, 0x3f));
        let sender_mac = MacAddr(cur.take_array());
        let res3 = cur.take_array();
        let sender_gid = Ipv6Addr::from(cur.take_array::<16>());
        let sender_qp = cur.get_u24();
        let link = cur.get_u8();
        let b = cur.get_u8();
        let (res4, mtu) = (bits(b, 0xf0), QpMtu(bits(b, 0x0f)));
        let psn = cur.get_u24();
        let res5 = cur.take_array();
        debug_assert_eq!(cur.remaining(), 0);

        AddLink {
            base: RawMessage::from_message(buf),
            res1,
            reason,
            reply,
            reject,
            res2,
            sender_mac,
            res3,
            sender_gid,
            sender_qp,
            link,
            res4,
            mtu,
            psn,
            res5,
        }
    }

    /// Reason code, meaningful in rejections.
    pub fn reason(&self) -> AddLinkReason {
        self.reason
    }

    /// Whether this is a reply.
    pub fn reply(&self) -> bool {
        self.reply
    }

    /// Whether the request was rejected.
    pub fn reject(&self) -> bool {
        self.reject
    }

    /// MAC address of the sending RoCE device.
    pub fn sender_mac(&self) -> MacAddr {
        self.sender_mac
    }

    /// GID of the sending RoCE device.
    pub fn sender_gid(&self) -> Ipv6Addr {
        self.sender_gid
    }

    /// Queue pair number of the sender.
    pub fn sender_qp(&self) -> u32 {
        self.sender_qp
    }

    /// Link id.
    pub fn link(&self) -> u8 {
        self.link
    }

    /// Path MTU of the sender's queue pair.
    pub fn mtu(&self) -> QpMtu {
        self.mtu
    }

    /// Initial packet sequence number.
    pub fn psn(&self) -> u32 {
        self.psn
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        self.base
            .fields(out, "LLC Add Link", verbose)
            .reserved(&format_args!("{:#x}", self.res1))
            .field("Reason Code", &self.reason)
            .field("Reply", &self.reply)
            .field("Rejection", &self.reject)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Sender MAC", &self.sender_mac)
            .reserved(&HexBytes(&self.res3))
            .field("Sender GID", &canonical_ip(self.sender_gid))
            .field("Sender QP", &self.sender_qp)
            .field("Link", &self.link)
            .reserved(&format_args!("{:#x}", self.res4))
            .field("MTU", &self.mtu)
            .field("Initial PSN", &self.psn)
            .reserved(&HexBytes(&self.res5))
            .finish()
    }
}

impl_message_render!(AddLink);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Render;

    static ADD_LINK: [u8; 44] = [
        0x02, 0x2c, 0x00, 0x00, 0x98, 0x03, 0x9b, 0xab, 0xcd, 0xef, 0x00, 0x00, 0xfe, 0x80, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x9a, 0x03, 0x9b, 0xff, 0xfe, 0xab, 0xcd, 0xef, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    #[test]
    fn add_link_render() {
        let a = AddLink::parse(&ADD_LINK);
        assert_eq!(
            a.to_compact(),
            "LLC Add Link: Type: 2, Length: 44, \
             Reason Code: 0 (unknown), Reply: false, Rejection: false, \
             Sender MAC: 98:03:9b:ab:cd:ef, \
             Sender GID: fe80::9a03:9bff:feab:cdef, \
             Sender QP: 0, Link: 0, MTU: 0 (reserved), Initial PSN: 0\n"
        );
        assert_eq!(
            a.to_verbose(),
            "LLC Add Link: Type: 2, Length: 44, Reserved: 0x0, \
             Reason Code: 0 (unknown), Reply: false, Rejection: false, \
             Reserved: 0x0, Sender MAC: 98:03:9b:ab:cd:ef, Reserved: 0x0000, \
             Sender GID: fe80::9a03:9bff:feab:cdef, \
             Sender QP: 0, Link: 0, Reserved: 0x0, MTU: 0 (reserved), \
             Initial PSN: 0, Reserved: 0x0000000000000000\n"
        );
        assert_eq!(
            a.hex(),
            "00000000  02 2c 00 00 98 03 9b ab  cd ef 00 00 fe 80 00 00  |.,..............|\n\
             00000010  00 00 00 00 9a 03 9b ff  fe ab cd ef 00 00 00 00  |................|\n\
             00000020  00 00 00 00 00 00 00 00  00 00 00 00              |............|\n"
        );
    }

    #[test]
    fn add_link_bit_groups() {
        let mut buf = ADD_LINK;
        buf[2] = 0x52;
        buf[3] = 0x7f;
        buf[28] = 0x00;
        buf[29] = 0x01;
        buf[30] = 0x07;
        buf[31] = 0x03;
        buf[32] = 0xa4;
        buf[33] = 0x7b;
        buf[34] = 0x28;
        buf[35] = 0x94;
        let a = AddLink::parse(&buf);
        assert_eq!(a.reason(), AddLinkReason::INVALID_MTU);
        assert_eq!(a.reply(), false);
        assert_eq!(a.reject(), true);
        assert_eq!(a.sender_qp(), 263);
        assert_eq!(a.link(), 3);
        assert_eq!(a.mtu(), QpMtu::MTU_2048);
        assert_eq!(a.psn(), 8071316);

        let verbose = a.to_verbose();
        assert!(verbose.contains("Reserved: 0x5, Reason Code: 2 (invalid MTU value specified)"));
        assert!(verbose.contains("Rejection: true, Reserved: 0x3f"));
        assert!(verbose.contains("Link: 3, Reserved: 0xa, MTU: 4 (2048), Initial PSN: 8071316"));
    }

    #[test]
    fn code_names() {
        assert_eq!(AddLinkReason(1).to_string(), "1 (no alternate path available)");
        assert_eq!(AddLinkReason(9).to_string(), "9 (unknown)");
        assert_eq!(QpMtu(1).to_string(), "1 (256)");
        assert_eq!(QpMtu(5).to_string(), "5 (4096)");
        assert_eq!(QpMtu(6).to_string(), "6 (reserved)");
    }
}
