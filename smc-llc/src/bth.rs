//! InfiniBand Base Transport Header.

use std::fmt;

use crate::fields::{bits, flag, read_uint_from_be_bytes};
use crate::llc::MessageType;
use crate::render::{FieldList, Render};

/// Length of the BTH.
pub const BTH_LEN: usize = 12;

enum_sim! {
    /// Transport service class, the top 3 bits of the opcode.
    pub struct TransportClass (u8) {
        /// Reliable Connection.
        RC = 0b000,
        /// Unreliable Connection.
        UC = 0b001,
        /// Reliable Datagram.
        RD = 0b010,
        /// Unreliable Datagram.
        UD = 0b011,
        /// Congestion Notification Packet.
        CNP = 0b100,
        /// Extended Reliable Connection.
        XRC = 0b101,
    }
}

impl TransportClass {
    /// Short name of the class, `None` for the manufacturer specific range.
    pub fn name(&self) -> Option<&'static str> {
        match *self {
            Self::RC => Some("RC"),
            Self::UC => Some("UC"),
            Self::RD => Some("RD"),
            Self::UD => Some("UD"),
            Self::CNP => Some("CNP"),
            Self::XRC => Some("XRC"),
            _ => None,
        }
    }
}

const RC_OPS: [&str; 24] = [
    "SEND First",
    "SEND Middle",
    "SEND Last",
    "SEND Last with Immediate",
    "SEND Only",
    "SEND Only with Immediate",
    "RDMA WRITE First",
    "RDMA WRITE Middle",
    "RDMA WRITE Last",
    "RDMA WRITE Last with Immediate",
    "RDMA WRITE Only",
    "RDMA WRITE Only with Immediate",
    "RDMA READ Request",
    "RDMA READ response First",
    "RDMA READ response Middle",
    "RDMA READ response Last",
    "RDMA READ response Only",
    "Acknowledge",
    "ATOMIC Acknowledge",
    "CmpSwap",
    "FetchAdd",
    "Reserved",
    "SEND Last with Invalidate",
    "SEND Only with Invalidate",
];

const RD_OPS: [&str; 22] = [
    "SEND First",
    "SEND Middle",
    "SEND Last",
    "SEND Last with Immediate",
    "SEND Only",
    "SEND Only with Immediate",
    "RDMA WRITE First",
    "RDMA WRITE Middle",
    "RDMA WRITE Last",
    "RDMA WRITE Last with Immediate",
    "RDMA WRITE Only",
    "RDMA WRITE Only with Immediate",
    "RDMA READ Request",
    "RDMA READ response First",
    "RDMA READ response Middle",
    "RDMA READ response Last",
    "RDMA READ response Only",
    "Acknowledge",
    "ATOMIC Acknowledge",
    "CmpSwap",
    "FetchAdd",
    "RESYNC",
];

const UD_OPS: [&str; 6] = [
    "Reserved",
    "Reserved",
    "Reserved",
    "Reserved",
    "SEND Only",
    "SEND Only with Immediate",
];

/// The 8-bit BTH opcode.
///
/// Displays as the binary value followed by class and operation, e.g.
/// `0b100 (RC SEND Only)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Opcode(pub u8);

impl Opcode {
    /// The transport service class.
    #[inline]
    pub fn class(&self) -> TransportClass {
        TransportClass(self.0 >> 5)
    }

    /// The operation selected by the low 5 bits, interpreted in the table of
    /// [`Opcode::class`]. Returns `None` in the manufacturer specific range.
    pub fn operation(&self) -> Option<&'static str> {
        let op = usize::from(self.0 & 0x1f);
        let table: &[&'static str] = match self.class() {
            TransportClass::RC | TransportClass::XRC => &RC_OPS,
            // UC supports the first twelve RC operations.
            TransportClass::UC => &RC_OPS[..12],
            TransportClass::RD => &RD_OPS,
            TransportClass::UD => &UD_OPS,
            TransportClass::CNP => &["CNP"],
            _ => return None,
        };
        Some(table.get(op).copied().unwrap_or("Reserved"))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b} (", self.0)?;
        match (self.class().name(), self.operation()) {
            (Some(class), Some(op)) => write!(f, "{} {}", class, op)?,
            _ => f.write_str("Manufacturer Specific")?,
        }
        f.write_str(")")
    }
}

/// A decoded Base Transport Header.
///
/// Fields are read from the stored header bytes on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bth {
    buf: [u8; BTH_LEN],
}

impl Bth {
    /// Copy the BTH from the front of `buf`.
    ///
    /// Returns `buf` back if it is shorter than [`BTH_LEN`].
    #[inline]
    pub fn parse(buf: &[u8]) -> Result<Self, &[u8]> {
        match buf.get(..BTH_LEN).and_then(|header| header.try_into().ok()) {
            Some(header) => Ok(Bth::from_header_array(header)),
            None => Err(buf),
        }
    }

    /// Create a BTH from its header bytes.
    #[inline]
    pub fn from_header_array(buf: [u8; BTH_LEN]) -> Self {
        Bth { buf }
    }

    /// Operation code.
    #[inline]
    pub fn opcode(&self) -> Opcode {
        Opcode(self.buf[0])
    }

    /// Solicited event.
    #[inline]
    pub fn se(&self) -> bool {
        flag(self.buf[1], 0x80)
    }

    /// Migration request.
    #[inline]
    pub fn m(&self) -> bool {
        flag(self.buf[1], 0x40)
    }

    /// Pad count.
    #[inline]
    pub fn pad(&self) -> u8 {
        bits(self.buf[1], 0x30)
    }

    /// Transport header version.
    #[inline]
    pub fn tver(&self) -> u8 {
        bits(self.buf[1], 0x0f)
    }

    /// Partition key.
    #[inline]
    pub fn pkey(&self) -> u16 {
        u16::from_be_bytes([self.buf[2], self.buf[3]])
    }

    /// Forward explicit congestion notification.
    #[inline]
    pub fn fecn(&self) -> bool {
        flag(self.buf[4], 0x80)
    }

    /// Backward explicit congestion notification.
    #[inline]
    pub fn becn(&self) -> bool {
        flag(self.buf[4], 0x40)
    }

    /// The 6 reserved bits following BECN.
    #[inline]
    pub fn reserved1(&self) -> u8 {
        bits(self.buf[4], 0x3f)
    }

    /// Destination queue pair.
    #[inline]
    pub fn dest_qp(&self) -> u32 {
        read_uint_from_be_bytes(&self.buf[5..8]) as u32
    }

    /// Acknowledge request.
    #[inline]
    pub fn a(&self) -> bool {
        flag(self.buf[8], 0x80)
    }

    /// The 7 reserved bits following the ack request.
    #[inline]
    pub fn reserved2(&self) -> u8 {
        bits(self.buf[8], 0x7f)
    }

    /// Packet sequence number.
    #[inline]
    pub fn psn(&self) -> u32 {
        read_uint_from_be_bytes(&self.buf[9..12]) as u32
    }
}

impl Render for Bth {
    fn write_to(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        FieldList::new(out, "BTH", verbose)
            .field("OpCode", &self.opcode())
            .field("SE", &self.se())
            .field("M", &self.m())
            .field("Pad", &self.pad())
            .field("TVer", &self.tver())
            .field("PKey", &self.pkey())
            .field("FECN", &self.fecn())
            .field("BECN", &self.becn())
            .reserved_as("Res", &format_args!("{:#x}", self.reserved1()))
            .field("DestQP", &self.dest_qp())
            .field("A", &self.a())
            .reserved_as("Res", &format_args!("{:#x}", self.reserved2()))
            .field("PSN", &self.psn())
            .finish()
    }

    fn raw(&self) -> &[u8] {
        &self.buf
    }

    fn layer_type(&self) -> MessageType {
        MessageType::BTH
    }
}

impl fmt::Display for Bth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false)
    }
}
