use std::fmt;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag};

/// Where an RMB is registered on another link of the link group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RmbSpec {
    /// Link id.
    pub link: u8,
    /// RKey of the RMB on that link.
    pub rkey: u32,
    /// Virtual address of the RMB on that link.
    pub vaddr: u64,
}

impl RmbSpec {
    /// Length of an RMB spec on the wire.
    pub const LEN: usize = 13;

    pub(crate) fn parse(cur: &mut Cursor<'_>) -> Self {
        let start = cur.cursor();
        let spec = RmbSpec {
            link: cur.get_u8(),
            rkey: cur.get_u32(),
            vaddr: cur.get_u64(),
        };
        debug_assert_eq!(cur.cursor() - start, Self::LEN);
        spec
    }
}

impl fmt::Display for RmbSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Link: {}, RKey: {}, Virtual Address: {:#x}]",
            self.link, self.rkey, self.vaddr
        )
    }
}

/// LLC Confirm RKey, announcing a new RMB on every link of a link group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmRkey {
    base: RawMessage,
    res1: u8,
    reply: bool,
    res2: u8,
    reject: bool,
    retry: bool,
    res3: u8,
    num_tokens: u8,
    rkey: u32,
    vaddr: u64,
    other_rmbs: [RmbSpec; 2],
    res4: u8,
}

impl ConfirmRkey {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let num_tokens = cur.get_u8();
        let rkey = cur.get_u32();
        let vaddr = cur.get_u64();
        let other_rmbs = [RmbSpec::parse(&mut cur), RmbSpec::parse(&mut cur)];
        let res4 = cur.get_u8();
        debug_assert_eq!(cur.remaining(), 0);

        ConfirmRkey {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            res2: bits(b, 0x40),
            reject: flag(b, 0x20),
            retry: flag(b, 0x10),
            res3: bits(b, 0x0f),
            num_tokens,
            rkey,
            vaddr,
            other_rmbs,
            res4,
        }
    }

    /// Whether this is a reply.
    pub fn reply(&self) -> bool {
        self.reply
    }

    /// Negative response.
    pub fn reject(&self) -> bool {
        self.reject
    }

    /// Configuration retry.
    pub fn retry(&self) -> bool {
        self.retry
    }

    /// Number of other links the RMB is announced for.
    pub fn num_tokens(&self) -> u8 {
        self.num_tokens
    }

    /// RKey of the RMB on the link carrying this message.
    pub fn rkey(&self) -> u32 {
        self.rkey
    }

    /// Virtual address of the RMB on the link carrying this message.
    pub fn vaddr(&self) -> u64 {
        self.vaddr
    }

    /// RMB specs for the other links.
    pub fn other_rmbs(&self) -> &[RmbSpec; 2] {
        &self.other_rmbs
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        let mut list = self.base.fields(out, "LLC Confirm RKey", verbose);
        list.reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Negative Response", &self.reject)
            .field("Configuration Retry", &self.retry)
            .reserved(&format_args!("{:#x}", self.res3))
            .field("Number of Tokens", &self.num_tokens)
            .field("This RKey", &self.rkey)
            .field("This VAddr", &format_args!("{:#x}", self.vaddr));
        for (i, rmb) in self.other_rmbs.iter().enumerate() {
            list.field(&format!("Other Link RMB {}", i + 1), rmb);
        }
        list.reserved(&format_args!("{:#x}", self.res4)).finish()
    }
}

impl_message_render!(ConfirmRkey);
