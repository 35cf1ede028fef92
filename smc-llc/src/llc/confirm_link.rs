use std::fmt;
use std::net::Ipv6Addr;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::ether::MacAddr;
use crate::fields::{bits, canonical_ip, flag, HexBytes};

/// LLC Confirm Link, sent by the server to confirm the first link of a
/// link group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmLink {
    base: RawMessage,
    res1: u8,
    reply: bool,
    res2: u8,
    sender_mac: MacAddr,
    sender_gid: Ipv6Addr,
    sender_qp: u32,
    link: u8,
    sender_link_user_id: u32,
    max_links: u8,
    res3: [u8; 9],
}

impl ConfirmLink {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let sender_mac = MacAddr(cur.take_array());
        let sender_gid = Ipv6Addr::from(cur.take_array::<16>());
        let sender_qp = cur.get_u24();
        let link = cur.get_u8();
        let sender_link_user_id = cur.get_u32();
        let max_links = cur.get_u8();
        let res3 = cur.take_array();
        debug_assert_eq!(cur.remaining(), 0);

        ConfirmLink {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            res2: bits(b, 0x7f),
            sender_mac,
            sender_gid,
            sender_qp,
            link,
            sender_link_user_id,
            max_links,
            res3,
        }
    }

    /// Whether this is a reply.
    pub fn reply(&self) -> bool {
        self.reply
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

    /// Link user id assigned by the sender.
    pub fn sender_link_user_id(&self) -> u32 {
        self.sender_link_user_id
    }

    /// Maximum number of links in the link group.
    pub fn max_links(&self) -> u8 {
        self.max_links
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        self.base
            .fields(out, "LLC Confirm Link", verbose)
            .reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Sender MAC", &self.sender_mac)
            .field("Sender GID", &canonical_ip(self.sender_gid))
            .field("Sender QP", &self.sender_qp)
            .field("Link", &self.link)
            .field("Sender Link UserID", &self.sender_link_user_id)
            .field("Max Links", &self.max_links)
            .reserved(&HexBytes(&self.res3))
            .finish()
    }
}

impl_message_render!(ConfirmLink);
