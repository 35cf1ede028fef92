use std::fmt;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag, HexBytes};

/// An RKey exchanged for a new link: the key on the existing link and the
/// key and address of the same buffer on the new link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RkeyPair {
    /// RKey of the buffer on the existing link.
    pub reference_rkey: u32,
    /// RKey of the buffer on the new link.
    pub new_rkey: u32,
    /// Virtual address of the buffer on the new link.
    pub new_vaddr: u64,
}

impl RkeyPair {
    fn parse(cur: &mut Cursor<'_>) -> Self {
        RkeyPair {
            reference_rkey: cur.get_u32(),
            new_rkey: cur.get_u32(),
            new_vaddr: cur.get_u64(),
        }
    }
}

impl fmt::Display for RkeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Reference RKey: {}, New RKey: {}, New Virtual Address: {:#x}]",
            self.reference_rkey, self.new_rkey, self.new_vaddr
        )
    }
}

/// LLC Add Link Continuation, carrying the RKeys of a new link.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddLinkCont {
    base: RawMessage,
    res1: u8,
    reply: bool,
    res2: u8,
    link: u8,
    num_rtokens: u8,
    res3: [u8; 2],
    rkey_pairs: [RkeyPair; 2],
    res4: [u8; 4],
}

impl AddLinkCont {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let link = cur.get_u8();
        let num_rtokens = cur.get_u8();
        let res3 = cur.take_array();
        let first = RkeyPair::parse(&mut cur);
        let second = RkeyPair::parse(&mut cur);
        let res4 = cur.take_array();
        debug_assert_eq!(cur.remaining(), 0);

        AddLinkCont {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            res2: bits(b, 0x7f),
            link,
            num_rtokens,
            res3,
            rkey_pairs: [first, second],
            res4,
        }
    }

    /// Whether this is a reply.
    pub fn reply(&self) -> bool {
        self.reply
    }

    /// Link id.
    pub fn link(&self) -> u8 {
        self.link
    }

    /// Number of RTokens still to be sent.
    pub fn num_rtokens(&self) -> u8 {
        self.num_rtokens
    }

    /// Both RKey pairs, in wire order.
    pub fn rkey_pairs(&self) -> &[RkeyPair; 2] {
        &self.rkey_pairs
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        let mut list = self.base.fields(out, "LLC Add Link Continuation", verbose);
        list.reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Link", &self.link)
            .field("Number of RTokens", &self.num_rtokens)
            .reserved(&HexBytes(&self.res3));
        for (i, pair) in self.rkey_pairs.iter().enumerate() {
            list.field(&format!("RKey Pair {}", i + 1), pair);
        }
        list.reserved(&HexBytes(&self.res4)).finish()
    }
}

impl_message_render!(AddLinkCont);
