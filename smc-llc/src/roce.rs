//! RoCE envelope decoding.
//!
//! A RoCEv1 envelope is `GRH | BTH | payload | ICRC`, a RoCEv2 envelope
//! (the UDP payload) is `BTH | payload | ICRC`. The ICRC is kept but never
//! verified.

use std::fmt;

use crate::bth::{Bth, BTH_LEN};
use crate::error::{DecodeError, Result};
use crate::grh::{Grh, GRH_LEN};
use crate::llc::{decode_message, Message};

/// Length of the invariant CRC trailing every RoCE packet.
pub const ICRC_LEN: usize = 4;

/// UDP destination port of RoCEv2.
pub const ROCEV2_UDP_PORT: u16 = 4791;

/// RoCE encapsulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoceVersion {
    /// Directly over Ethernet, ethertype `0x8915`, with a GRH.
    V1,
    /// Over UDP/IP, destination port 4791, without a GRH.
    V2,
}

impl RoceVersion {
    /// Smallest envelope of this version: headers plus ICRC.
    pub const fn min_len(&self) -> usize {
        match self {
            RoceVersion::V1 => GRH_LEN + BTH_LEN + ICRC_LEN,
            RoceVersion::V2 => BTH_LEN + ICRC_LEN,
        }
    }
}

impl fmt::Display for RoceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoceVersion::V1 => f.write_str("RoCEv1"),
            RoceVersion::V2 => f.write_str("RoCEv2"),
        }
    }
}

/// A decoded RoCE packet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Roce {
    /// Encapsulation the packet arrived in.
    pub version: RoceVersion,
    /// Present for RoCEv1 only.
    pub grh: Option<Grh>,
    /// Base transport header.
    pub bth: Bth,
    /// The payload between BTH and ICRC.
    pub llc: Message,
    /// Invariant CRC, unchecked.
    pub icrc: [u8; ICRC_LEN],
}

/// Split `buf` into its RoCE headers, payload and ICRC, and decode the
/// payload.
///
/// Fails with [`ErrorKind::TruncatedPacket`](crate::ErrorKind::TruncatedPacket)
/// if `buf` is shorter than [`RoceVersion::min_len`].
pub fn decode_envelope(version: RoceVersion, buf: &[u8]) -> Result<Roce> {
    if buf.len() < version.min_len() {
        let msg = format!("{} envelope", version);
        return DecodeError::truncated(version.min_len(), buf.len(), msg).to_err();
    }

    let (grh, rest) = match version {
        RoceVersion::V1 => {
            let grh =
                Grh::parse(buf).map_err(|b| DecodeError::truncated(GRH_LEN, b.len(), "GRH"))?;
            (Some(grh), &buf[GRH_LEN..])
        }
        RoceVersion::V2 => (None, buf),
    };
    let bth = Bth::parse(rest).map_err(|b| DecodeError::truncated(BTH_LEN, b.len(), "BTH"))?;

    let (payload, icrc) = rest[BTH_LEN..].split_at(rest.len() - BTH_LEN - ICRC_LEN);
    let mut trailer = [0; ICRC_LEN];
    trailer.copy_from_slice(icrc);

    Ok(Roce {
        version,
        grh,
        bth,
        llc: decode_message(payload),
        icrc: trailer,
    })
}
