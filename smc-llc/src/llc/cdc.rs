use std::fmt;

use bytes::Buf;

use super::{RawMessage, MSG_LEN};
use crate::cursors::Cursor;
use crate::fields::{bits, flag, HexBytes};
use crate::render::FieldList;

/// Connection Data Control message.
///
/// Exchanged per SMC connection to advance the producer and consumer
/// cursors of the peer's receive buffer and to signal connection state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cdc {
    base: RawMessage,
    seq_num: u16,
    alert_token: u32,
    res1: [u8; 2],
    prod_wrap: u16,
    prod_cursor: u32,
    res2: [u8; 2],
    cons_wrap: u16,
    cons_cursor: u32,
    writer_blocked: bool,
    urgent_pending: bool,
    urgent_present: bool,
    cursor_update_requested: bool,
    failover_validation: bool,
    res3: u8,
    sending_done: bool,
    peer_conn_closed: bool,
    abnormal_close: bool,
    // Low 5 bits of the connection state byte followed by 18 reserved bytes.
    res4: [u8; 19],
}

impl Cdc {
    pub(crate) fn parse(buf: &[u8; MSG_LEN]) -> Self {
        let mut cur = Cursor::new(&buf[..]);
        cur.advance(2);

        let seq_num = cur.get_u16();
        let alert_token = cur.get_u32();
        let res1 = cur.take_array();
        let prod_wrap = cur.get_u16();
        let prod_cursor = cur.get_u32();
        let res2 = cur.take_array();
        let cons_wrap = cur.get_u16();
        let cons_cursor = cur.get_u32();
        let flags = cur.get_u8();
        let state = cur.get_u8();
        let mut res4 = [0u8; 19];
        res4[0] = bits(state, 0x1f);
        cur.copy_to_slice(&mut res4[1..]);
        debug_assert_eq!(cur.remaining(), 0);

        Cdc {
            base: RawMessage::from_message(buf),
            seq_num,
            alert_token,
            res1,
            prod_wrap,
            prod_cursor,
            res2,
            cons_wrap,
            cons_cursor,
            writer_blocked: flag(flags, 0x80),
            urgent_pending: flag(flags, 0x40),
            urgent_present: flag(flags, 0x20),
            cursor_update_requested: flag(flags, 0x10),
            failover_validation: flag(flags, 0x08),
            res3: bits(flags, 0x07),
            sending_done: flag(state, 0x80),
            peer_conn_closed: flag(state, 0x40),
            abnormal_close: flag(state, 0x20),
            res4,
        }
    }

    /// Sequence number.
    pub fn seq_num(&self) -> u16 {
        self.seq_num
    }

    /// Alert token identifying the connection.
    pub fn alert_token(&self) -> u32 {
        self.alert_token
    }

    /// Producer cursor as `(wrap sequence, cursor)`.
    pub fn producer(&self) -> (u16, u32) {
        (self.prod_wrap, self.prod_cursor)
    }

    /// Consumer cursor as `(wrap sequence, cursor)`.
    pub fn consumer(&self) -> (u16, u32) {
        (self.cons_wrap, self.cons_cursor)
    }

    /// Writer blocked.
    pub fn writer_blocked(&self) -> bool {
        self.writer_blocked
    }

    /// Urgent data pending.
    pub fn urgent_pending(&self) -> bool {
        self.urgent_pending
    }

    /// Urgent data present.
    pub fn urgent_present(&self) -> bool {
        self.urgent_present
    }

    /// Request for consumer cursor update.
    pub fn cursor_update_requested(&self) -> bool {
        self.cursor_update_requested
    }

    /// Failover validation.
    pub fn failover_validation(&self) -> bool {
        self.failover_validation
    }

    /// Sending done.
    pub fn sending_done(&self) -> bool {
        self.sending_done
    }

    /// Peer connection closed.
    pub fn peer_conn_closed(&self) -> bool {
        self.peer_conn_closed
    }

    /// Abnormal close.
    pub fn abnormal_close(&self) -> bool {
        self.abnormal_close
    }

    fn write_fields(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        // This line writes "Length 44" without a colon.
        FieldList::new(out, "CDC", verbose)
            .field("Type", &self.base.msg_type().raw())
            .entry(&format_args!("Length {}", self.base.length()))
            .field("Sequence Number", &self.seq_num)
            .field("Alert Token", &self.alert_token)
            .reserved(&HexBytes(&self.res1))
            .field("Producer Wrap", &self.prod_wrap)
            .field("Producer Cursor", &self.prod_cursor)
            .reserved(&HexBytes(&self.res2))
            .field("Consumer Wrap", &self.cons_wrap)
            .field("Consumer Cursor", &self.cons_cursor)
            .field("Writer Blocked", &self.writer_blocked)
            .field("Urgent Data Pending", &self.urgent_pending)
            .field("Urgent Data Present", &self.urgent_present)
            .field("Request for Consumer Cursor Update", &self.cursor_update_requested)
            .field("Failover Validation", &self.failover_validation)
            .reserved(&format_args!("{:#x}", self.res3))
            .field("Sending Done", &self.sending_done)
            .field("Peer Connection Closed", &self.peer_conn_closed)
            .field("Abnormal Close", &self.abnormal_close)
            .reserved(&HexBytes(&self.res4))
            .finish()
    }
}

impl_message_render!(Cdc);
