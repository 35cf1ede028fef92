#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! Decode SMC-R LLC/CDC control messages carried inside RoCE packets and
//! render them as text.
//!
//! A packet goes through three stateless steps:
//!
//! 1. [`roce::decode_envelope`] strips the GRH (RoCEv1 only), the BTH and the
//!    trailing invariant CRC.
//! 2. [`llc::decode_message`] classifies the remaining 44-byte payload.
//! 3. [`render::render`] turns the decoded parts into output lines.
//!
//! [`frame::decode_frame`] chains all three, starting from a raw Ethernet
//! frame.

#[macro_use]
mod macros;

mod cursors;
pub use cursors::Cursor;

mod error;
pub use error::{DecodeError, ErrorKind, Result};

mod fields;
pub use fields::HexBytes;

pub mod bth;
pub mod ether;
pub mod frame;
pub mod grh;
pub mod hexdump;
pub mod llc;
pub mod output;
pub mod render;
pub mod roce;

pub use frame::{decode_frame, RoceFrame};
pub use output::OutputBuffer;
pub use llc::{decode_message, Message, MessageType};
pub use render::{render, DisplayOpts, PacketMeta, Render};
pub use roce::{decode_envelope, Roce, RoceVersion};
