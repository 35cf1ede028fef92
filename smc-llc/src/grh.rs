//! Global Routing Header.
//!
//! The GRH precedes the BTH in RoCEv1 packets. Its layout is that of an IPv6
//! header, so field access is delegated to `smoltcp`'s IPv6 packet view.

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use smoltcp::wire::{IpProtocol, Ipv6Packet};

use crate::fields::canonical_ip;
use crate::llc::MessageType;
use crate::render::{FieldList, Render};

/// Length of the GRH.
pub const GRH_LEN: usize = 40;

/// Next header value announcing a BTH.
pub const BTH_NEXT_HEADER: u8 = 0x1b;

/// A decoded Global Routing Header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grh {
    buf: [u8; GRH_LEN],
}

impl Grh {
    /// Copy the GRH from the front of `buf`.
    ///
    /// Returns `buf` back if it is shorter than [`GRH_LEN`].
    #[inline]
    pub fn parse(buf: &[u8]) -> Result<Self, &[u8]> {
        match buf.get(..GRH_LEN) {
            Some(header) => {
                let mut grh = Grh { buf: [0; GRH_LEN] };
                grh.buf.copy_from_slice(header);
                Ok(grh)
            }
            None => Err(buf),
        }
    }

    #[inline]
    fn view(&self) -> Ipv6Packet<&[u8]> {
        Ipv6Packet::new_unchecked(&self.buf[..])
    }

    /// IP version, 6 for a well-formed GRH.
    #[inline]
    pub fn version(&self) -> u8 {
        self.view().version()
    }

    /// The 8-bit traffic class.
    #[inline]
    pub fn traffic_class(&self) -> u8 {
        self.view().traffic_class()
    }

    /// The 20-bit flow label.
    #[inline]
    pub fn flow_label(&self) -> u32 {
        self.view().flow_label()
    }

    /// Number of bytes following the GRH.
    #[inline]
    pub fn payload_len(&self) -> u16 {
        self.view().payload_len()
    }

    /// Raw next header value, [`BTH_NEXT_HEADER`] in RoCEv1 packets.
    #[inline]
    pub fn next_header(&self) -> u8 {
        u8::from(self.view().next_header())
    }

    /// Hop limit.
    #[inline]
    pub fn hop_limit(&self) -> u8 {
        self.view().hop_limit()
    }

    /// Source GID.
    #[inline]
    pub fn src_addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.view().src_addr().0)
    }

    /// Destination GID.
    #[inline]
    pub fn dst_addr(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.view().dst_addr().0)
    }

    /// Source address in display form, IPv4-mapped addresses as dotted quad.
    #[inline]
    pub fn src_ip(&self) -> IpAddr {
        canonical_ip(self.src_addr())
    }

    /// Destination address in display form.
    #[inline]
    pub fn dst_ip(&self) -> IpAddr {
        canonical_ip(self.dst_addr())
    }
}

/// `BTH` for the expected value, the generic protocol name otherwise.
struct NextHeader(u8);

impl fmt::Display for NextHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == BTH_NEXT_HEADER {
            f.write_str("BTH")
        } else {
            write!(f, "{}", IpProtocol::from(self.0))
        }
    }
}

impl Render for Grh {
    // The GRH has no reserved fields, both modes print the same line.
    fn write_to(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result {
        FieldList::new(out, "GRH", verbose)
            .field("Version", &self.version())
            .field("Traffic Class", &self.traffic_class())
            .field("Flow Label", &self.flow_label())
            .field("Length", &self.payload_len())
            .field("Next Header", &NextHeader(self.next_header()))
            .field("Hop Limit", &self.hop_limit())
            .field("Source", &self.src_ip())
            .field("Destination", &self.dst_ip())
            .finish()
    }

    fn raw(&self) -> &[u8] {
        &self.buf
    }

    fn layer_type(&self) -> MessageType {
        MessageType::GRH
    }
}

impl fmt::Display for Grh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f, false)
    }
}
