use std::fmt;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag, HexBytes};

/// LLC Delete RKey, invalidating up to eight RMBs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeleteRkey {
    base: RawMessage,
    res1: u8,
    reply: bool,
    res2: u8,
    reject: bool,
    res3: u8,
    count: u8,
    error_mask: u8,
    res4: [u8; 2],
    rkeys: [u32; 8],
    res5: [u8; 4],
}

impl DeleteRkey {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let res1 = cur.get_u8();
        let b = cur.get_u8();
        let count = cur.get_u8();
        let error_mask = cur.get_u8();
        let res4 = cur.take_array();
        let mut rkeys = [0u32; 8];
        for rkey in rkeys.iter_mut() {
            *rkey = cur.get_u32();
        }
        let res5 = cur.take_array();
        debug_assert_eq!(cur.remaining(), 0);

        DeleteRkey {
            base: RawMessage::from_message(buf),
            res1,
            reply: flag(b, 0x80),
            res2: bits(b, 0x40),
            reject: flag(b, 0x20),
            res3: bits(b, 0x1f),
            count,
            error_mask,
            res4,
            rkeys,
            res5,
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

    /// Number of valid entries in [`DeleteRkey::rkeys`].
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Bit `7 - i` is set if deleting `rkeys()[i]` failed.
    pub fn error_mask(&self) -> u8 {
        self.error_mask
    }

    /// The RKeys to delete.
    pub fn rkeys(&self) -> &[u32; 8] {
        &self.rkeys
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        let mut list = self.base.fields(out, "LLC Delete RKey", verbose);
        list.reserved(&format_args!("{:#x}", self.res1))
            .field("Reply", &self.reply)
            .reserved(&format_args!("{:#x}", self.res2))
            .field("Negative Response", &self.reject)
            .reserved(&format_args!("{:#x}", self.res3))
            .field("Count", &self.count)
            .field("Error Mask", &format_args!("{:#b}", self.error_mask))
            .reserved(&HexBytes(&self.res4));
        for (i, rkey) in self.rkeys.iter().enumerate() {
            list.field(&format!("RKey {}", i), rkey);
        }
        list.reserved(&HexBytes(&self.res5)).finish()
    }
}

impl_message_render!(DeleteRkey);
