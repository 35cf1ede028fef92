use std::fmt;

use bytes::Buf;

use super::{RawMessage, RmbSpec, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag};

/// LLC Confirm RKey Continuation, carrying RMB specs that did not fit into
/// the Confirm RKey message.
///
/// The three RMB specs fill the message exactly, there is no trailing
/// reserved byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfirmRkeyCont {
    base: RawMessage,
    res1: u8,
    reply: bool,
    res2: u8,
    reject: bool,
    res3: u8,
    num_tokens: u8,
    other_rmbs: [RmbSpec; 3],
}

impl ConfirmRkeyCont {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let num_tokens = cur.get_u8();
        let other_rmbs = [
            RmbSpec::parse(&mut cur),
            RmbSpec::parse(&mut cur),
            RmbSpec::parse(&mut cur),
        ];
        debug_assert_eq!(cur.remaining(), 0);

        ConfirmRkeyCont {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            res2: bits(b, 0x40),
            reject: flag(b, 0x20),
            res3: bits(b, 0x1f),
            num_tokens,
            other_rmbs,
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

    /// Number of RMB specs still to be sent.
    pub fn num_tokens(&self) -> u8 {
        self.num_tokens
    }

    /// RMB specs for other links.
    pub fn other_rmbs(&self) -> &[RmbSpec; 3] {
        &self.other_rmbs
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        let mut list = self.base.fields(out, "LLC Confirm RKey Continuation", verbose);
        list.reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Negative Response", &self.reject)
            .reserved(&format_args!("{:#x}", self.res3))
            .field("Number of Tokens", &self.num_tokens);
        for (i, rmb) in self.other_rmbs.iter().enumerate() {
            list.field(&format!("Other Link RMB {}", i + 1), rmb);
        }
        list.finish()
    }
}

impl_message_render!(ConfirmRkeyCont);
