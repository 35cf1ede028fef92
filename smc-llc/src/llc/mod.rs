//! SMC-R LLC and CDC message decoding
//!
//! This module classifies the payload carried between the BTH and the ICRC of
//! an SMC-R packet. Link Layer Control (LLC) messages set up and tear down
//! RDMA links and exchange memory keys. Connection Data Control (CDC)
//! messages carry per-connection cursors and flags.
//!
//! # Message Layout
//!
//! All messages are exactly [`MSG_LEN`] bytes:
//! - **Type**: 1 byte discriminant, see [`MessageType`]
//! - **Length**: 1 byte, 44 for every valid message
//! - **Body**: 42 bytes of type specific fields, reserved bits included
//!
//! A payload of any other length, or with an unknown type byte, is kept as
//! [`Other`]. Decoding never fails.
//!
//! # Example
//!
//! ```rust
//! use smc_llc::llc::{decode_message, Message, MessageType};
//! use smc_llc::Render;
//!
//! let mut payload = [0u8; 44];
//! payload[0] = 0x07;
//! payload[1] = 44;
//! payload[3] = 0x80;
//!
//! let msg = decode_message(&payload);
//! assert!(matches!(msg, Message::TestLink(_)));
//! assert_eq!(msg.msg_type(), MessageType::TEST_LINK);
//! assert!(msg.to_compact().starts_with("LLC Test Link: Type 7, Length: 44, Reply: true"));
//!
//! let short = decode_message(&payload[..20]);
//! assert_eq!(short.msg_type(), MessageType::OTHER);
//! assert_eq!(short.to_compact(), "Other Payload\n");
//! ```

use std::fmt;

use bytes::Bytes;

use crate::render::{FieldList, Render};

mod add_link;
pub use add_link::{AddLink, AddLinkReason, QpMtu};

mod add_link_cont;
pub use add_link_cont::{AddLinkCont, RkeyPair};

mod cdc;
pub use cdc::Cdc;

mod confirm_link;
pub use confirm_link::ConfirmLink;

mod confirm_rkey;
pub use confirm_rkey::{ConfirmRkey, RmbSpec};

mod confirm_rkey_cont;
pub use confirm_rkey_cont::ConfirmRkeyCont;

mod delete_link;
pub use delete_link::{DeleteLink, DeleteLinkReason};

mod delete_rkey;
pub use delete_rkey::DeleteRkey;

mod other;
pub use other::Other;

mod test_link;
pub use test_link::TestLink;

/// Length of every LLC and CDC message.
pub const MSG_LEN: usize = 44;

enum_sim! {
    /// Type tag of a decoded part.
    ///
    /// Values up to `0xff` are the on-wire message type byte. Values above
    /// it tag the parts that have no type byte of their own.
    pub struct MessageType (u16) {
        /// LLC Confirm Link.
        CONFIRM_LINK = 1,
        /// LLC Add Link.
        ADD_LINK = 2,
        /// LLC Add Link Continuation.
        ADD_LINK_CONT = 3,
        /// LLC Delete Link.
        DELETE_LINK = 4,
        /// LLC Confirm RKey.
        CONFIRM_RKEY = 6,
        /// LLC Test Link.
        TEST_LINK = 7,
        /// LLC Confirm RKey Continuation.
        CONFIRM_RKEY_CONT = 8,
        /// LLC Delete RKey.
        DELETE_RKEY = 9,
        /// Connection Data Control.
        CDC = 0xfe,
        /// Any payload that is not a known 44 byte message.
        OTHER = 0x101,
        /// Global Routing Header.
        GRH = 0x102,
        /// Base Transport Header.
        BTH = 0x103,
    }
}

/// The parts shared by every message: its bytes, type and length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawMessage {
    raw: Bytes,
    typ: MessageType,
    length: usize,
}

impl RawMessage {
    /// Take type and length from the first two message bytes.
    pub(crate) fn from_message(buf: &[u8; MSG_LEN]) -> Self {
        RawMessage {
            raw: Bytes::copy_from_slice(buf),
            typ: MessageType::from(u16::from(buf[0])),
            length: usize::from(buf[1]),
        }
    }

    /// Tag `buf` as [`MessageType::OTHER`], recording its actual length.
    pub(crate) fn other(buf: &[u8]) -> Self {
        RawMessage {
            raw: Bytes::copy_from_slice(buf),
            typ: MessageType::OTHER,
            length: buf.len(),
        }
    }

    /// The message bytes.
    #[inline]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// The message type.
    #[inline]
    pub fn msg_type(&self) -> MessageType {
        self.typ
    }

    /// Length from the length byte, or the payload length for `Other`.
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Start an LLC line with the `Type` and `Length` fields.
    pub(crate) fn fields<'a>(
        &self,
        out: &'a mut dyn fmt::Write,
        title: &str,
        verbose: bool,
    ) -> FieldList<'a> {
        let mut list = FieldList::new(out, title, verbose);
        list.field("Type", &self.typ.raw()).field("Length", &self.length);
        list
    }
}

/// A decoded LLC or CDC message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Message {
    /// LLC Confirm Link.
    ConfirmLink(ConfirmLink),
    /// LLC Add Link.
    AddLink(AddLink),
    /// LLC Add Link Continuation.
    AddLinkCont(AddLinkCont),
    /// LLC Delete Link.
    DeleteLink(DeleteLink),
    /// LLC Confirm RKey.
    ConfirmRkey(ConfirmRkey),
    /// LLC Test Link.
    TestLink(TestLink),
    /// LLC Confirm RKey Continuation.
    ConfirmRkeyCont(ConfirmRkeyCont),
    /// LLC Delete RKey.
    DeleteRkey(DeleteRkey),
    /// Connection Data Control.
    Cdc(Cdc),
    /// Anything else.
    Other(Other),
}

impl Message {
    fn inner(&self) -> &dyn Render {
        match self {
            Message::ConfirmLink(m) => m,
            Message::AddLink(m) => m,
            Message::AddLinkCont(m) => m,
            Message::DeleteLink(m) => m,
            Message::ConfirmRkey(m) => m,
            Message::TestLink(m) => m,
            Message::ConfirmRkeyCont(m) => m,
            Message::DeleteRkey(m) => m,
            Message::Cdc(m) => m,
            Message::Other(m) => m,
        }
    }

    /// The message type, [`MessageType::OTHER`] for undecoded payloads.
    #[inline]
    pub fn msg_type(&self) -> MessageType {
        self.inner().layer_type()
    }
}

impl Render for Message {
    fn write_to(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        self.inner().write_to(out, verbose)
    }

    fn raw(&self) -> &[u8] {
        self.inner().raw()
    }

    fn layer_type(&self) -> MessageType {
        self.inner().layer_type()
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false)
    }
}

/// Classify and decode an LLC/CDC payload.
pub fn decode_message(payload: &[u8]) -> Message {
    let buf: &[u8; MSG_LEN] = match payload.try_into() {
        Ok(buf) => buf,
        Err(_) => {
            tracing::trace!(len = payload.len(), "payload length is not 44, keeping as other");
            return Message::Other(Other::parse(payload));
        }
    };

    let msg = match MessageType::from(u16::from(buf[0])) {
        MessageType::CONFIRM_LINK => Message::ConfirmLink(ConfirmLink::parse(buf)),
        MessageType::ADD_LINK => Message::AddLink(AddLink::parse(buf)),
        MessageType::ADD_LINK_CONT => Message::AddLinkCont(AddLinkCont::parse(buf)),
        MessageType::DELETE_LINK => Message::DeleteLink(DeleteLink::parse(buf)),
        MessageType::CONFIRM_RKEY => Message::ConfirmRkey(ConfirmRkey::parse(buf)),
        MessageType::TEST_LINK => Message::TestLink(TestLink::parse(buf)),
        MessageType::CONFIRM_RKEY_CONT => Message::ConfirmRkeyCont(ConfirmRkeyCont::parse(buf)),
        MessageType::DELETE_RKEY => Message::DeleteRkey(DeleteRkey::parse(buf)),
        MessageType::CDC => Message::Cdc(Cdc::parse(buf)),
        _ => Message::Other(Other::parse(payload)),
    };
    tracing::trace!(type_byte = buf[0], msg_type = msg.msg_type().raw(), "classified message");
    msg
}
