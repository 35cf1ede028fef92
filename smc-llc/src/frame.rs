//! Ethernet frame classification.
//!
//! Finds the RoCE envelope inside a captured Ethernet frame. RoCEv1 is
//! recognized by its ethertype, RoCEv2 by the UDP destination port. Frames
//! carrying a single 802.1Q tag are looked through.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use byteorder::{ByteOrder, NetworkEndian};
use smoltcp::wire::{EthernetFrame, IpProtocol, Ipv4Packet, Ipv6Packet, UdpPacket};
use tracing::{debug, trace};

use crate::ether::{EtherType, MacAddr, VLAN_TAG_LEN};
use crate::fields::canonical_ip;
use crate::render::{render, DisplayOpts, PacketMeta};
use crate::roce::{decode_envelope, Roce, RoceVersion, ROCEV2_UDP_PORT};

/// A frame that carries a RoCE packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoceFrame<'a> {
    /// Encapsulation of the envelope.
    pub version: RoceVersion,
    /// Ethernet source.
    pub src_mac: MacAddr,
    /// Ethernet destination.
    pub dst_mac: MacAddr,
    /// Source and destination of the IP header, `None` for RoCEv1.
    pub ip: Option<(IpAddr, IpAddr)>,
    /// The RoCE envelope: Ethernet payload for RoCEv1, UDP payload for
    /// RoCEv2.
    pub envelope: &'a [u8],
}

impl<'a> RoceFrame<'a> {
    /// Classify `frame`. Returns `None` if it is not a RoCE frame or is too
    /// short for its own headers.
    pub fn parse(frame: &'a [u8]) -> Option<Self> {
        let eth = EthernetFrame::new_checked(frame).ok()?;
        let src_mac = MacAddr(eth.src_addr().0);
        let dst_mac = MacAddr(eth.dst_addr().0);
        let mut ethertype = EtherType::from(u16::from(eth.ethertype()));
        let mut payload = eth.payload();

        if ethertype == EtherType::VLAN {
            if payload.len() < VLAN_TAG_LEN {
                return None;
            }
            ethertype = EtherType::from(NetworkEndian::read_u16(&payload[2..4]));
            payload = &payload[VLAN_TAG_LEN..];
        }

        let (version, ip, envelope) = match ethertype {
            EtherType::ROCEV1 => (RoceVersion::V1, None, payload),
            EtherType::IPV4 => {
                let ip = Ipv4Packet::new_checked(payload).ok()?;
                if ip.protocol() != IpProtocol::Udp {
                    return None;
                }
                let addrs = (
                    IpAddr::V4(Ipv4Addr::from(ip.src_addr().0)),
                    IpAddr::V4(Ipv4Addr::from(ip.dst_addr().0)),
                );
                (RoceVersion::V2, Some(addrs), rocev2_payload(ip.payload())?)
            }
            EtherType::IPV6 => {
                let ip = Ipv6Packet::new_checked(payload).ok()?;
                if ip.next_header() != IpProtocol::Udp {
                    return None;
                }
                let addrs = (
                    canonical_ip(Ipv6Addr::from(ip.src_addr().0)),
                    canonical_ip(Ipv6Addr::from(ip.dst_addr().0)),
                );
                (RoceVersion::V2, Some(addrs), rocev2_payload(ip.payload())?)
            }
            _ => return None,
        };

        trace!(version = %version, len = envelope.len(), "found RoCE frame");
        Some(RoceFrame {
            version,
            src_mac,
            dst_mac,
            ip,
            envelope,
        })
    }

    /// Context header data for a packet decoded from this frame. RoCEv1
    /// endpoints are taken from the GRH.
    pub fn meta(&self, roce: &Roce, timestamp: Duration) -> PacketMeta {
        let (src_ip, dst_ip) = match (self.ip, roce.grh.as_ref()) {
            (Some(addrs), _) => addrs,
            (None, Some(grh)) => (grh.src_ip(), grh.dst_ip()),
            (None, None) => (Ipv6Addr::UNSPECIFIED.into(), Ipv6Addr::UNSPECIFIED.into()),
        };
        PacketMeta {
            timestamp,
            src_mac: self.src_mac,
            dst_mac: self.dst_mac,
            src_ip,
            dst_ip,
        }
    }
}

fn rocev2_payload(ip_payload: &[u8]) -> Option<&[u8]> {
    let udp = UdpPacket::new_checked(ip_payload).ok()?;
    if udp.dst_port() != ROCEV2_UDP_PORT {
        return None;
    }
    Some(udp.payload())
}

/// Decode and render one captured Ethernet frame.
///
/// `timestamp` is the capture time since the Unix epoch. Returns an empty
/// string for frames that are not RoCE, for truncated RoCE packets and for
/// packets whose parts are all filtered out by `opts`.
pub fn decode_frame(frame: &[u8], timestamp: Duration, opts: &DisplayOpts) -> String {
    let roce_frame = match RoceFrame::parse(frame) {
        Some(roce_frame) => roce_frame,
        None => return String::new(),
    };
    let roce = match decode_envelope(roce_frame.version, roce_frame.envelope) {
        Ok(roce) => roce,
        Err(err) => {
            debug!(%err, "dropping packet");
            return String::new();
        }
    };
    render(&roce, &roce_frame.meta(&roce, timestamp), opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DST_MAC: [u8; 6] = [0x98, 0x03, 0x9b, 0x12, 0x34, 0x56];
    const SRC_MAC: [u8; 6] = [0x98, 0x03, 0x9b, 0xab, 0xcd, 0xef];

    fn eth_header(ethertype: u16) -> Vec<u8> {
        let mut buf = DST_MAC.to_vec();
        buf.extend_from_slice(&SRC_MAC);
        buf.extend_from_slice(&ethertype.to_be_bytes());
        buf
    }

    fn udp_datagram(dst_port: u16, payload: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&50000u16.to_be_bytes());
        buf.extend_from_slice(&dst_port.to_be_bytes());
        buf.extend_from_slice(&((8 + payload.len()) as u16).to_be_bytes());
        buf.extend_from_slice(&[0, 0]);
        buf.extend_from_slice(payload);
        buf
    }

    fn ipv4_frame(protocol: u8, dst_port: u16, envelope: &[u8]) -> Vec<u8> {
        let udp = udp_datagram(dst_port, envelope);
        let mut buf = eth_header(0x0800);
        buf.extend_from_slice(&[0x45, 0x00]);
        buf.extend_from_slice(&((20 + udp.len()) as u16).to_be_bytes());
        buf.extend_from_slice(&[0x00, 0x00, 0x40, 0x00, 0x40, protocol, 0x00, 0x00]);
        buf.extend_from_slice(&[10, 0, 0, 1]);
        buf.extend_from_slice(&[10, 0, 0, 2]);
        buf.extend_from_slice(&udp);
        buf
    }

    #[test]
    fn rocev2_over_ipv4() {
        let envelope = [0xaau8; 20];
        let frame = ipv4_frame(17, 4791, &envelope);
        let rf = RoceFrame::parse(&frame).unwrap();
        assert_eq!(rf.version, RoceVersion::V2);
        assert_eq!(rf.src_mac, MacAddr(SRC_MAC));
        assert_eq!(rf.dst_mac, MacAddr(DST_MAC));
        assert_eq!(
            rf.ip,
            Some((
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1)),
                IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2))
            ))
        );
        assert_eq!(rf.envelope, &envelope[..]);
    }

    #[test]
    fn rocev2_over_ipv6() {
        let envelope = [0x55u8; 16];
        let udp = udp_datagram(4791, &envelope);
        let mut frame = eth_header(0x86dd);
        frame.extend_from_slice(&[0x60, 0, 0, 0]);
        frame.extend_from_slice(&(udp.len() as u16).to_be_bytes());
        frame.extend_from_slice(&[17, 64]);
        frame.extend_from_slice(&Ipv4Addr::new(192, 168, 0, 1).to_ipv6_mapped().octets());
        frame.extend_from_slice(&"fe80::1".parse::<Ipv6Addr>().unwrap().octets());
        frame.extend_from_slice(&udp);

        let rf = RoceFrame::parse(&frame).unwrap();
        let (src, dst) = rf.ip.unwrap();
        assert_eq!(src.to_string(), "192.168.0.1");
        assert_eq!(dst.to_string(), "fe80::1");
        assert_eq!(rf.envelope, &envelope[..]);
    }

    #[test]
    fn rocev1_behind_vlan_tag() {
        let mut frame = eth_header(0x8100);
        frame.extend_from_slice(&[0x00, 0x64, 0x89, 0x15]);
        frame.extend_from_slice(&[1, 2, 3, 4]);
        let rf = RoceFrame::parse(&frame).unwrap();
        assert_eq!(rf.version, RoceVersion::V1);
        assert_eq!(rf.ip, None);
        assert_eq!(rf.envelope, &[1, 2, 3, 4]);
    }

    #[test]
    fn not_roce() {
        // wrong port
        assert!(RoceFrame::parse(&ipv4_frame(17, 4792, &[0; 20])).is_none());
        // TCP
        assert!(RoceFrame::parse(&ipv4_frame(6, 4791, &[0; 20])).is_none());
        // ARP
        let mut arp = eth_header(0x0806);
        arp.extend_from_slice(&[0; 28]);
        assert!(RoceFrame::parse(&arp).is_none());
        // runt
        assert!(RoceFrame::parse(&DST_MAC).is_none());
        // VLAN tag cut short
        let mut vlan = eth_header(0x8100);
        vlan.extend_from_slice(&[0x00, 0x64]);
        assert!(RoceFrame::parse(&vlan).is_none());
    }

    #[test]
    fn truncated_roce_yields_nothing() {
        let frame = ipv4_frame(17, 4791, &[0; 15]);
        assert!(RoceFrame::parse(&frame).is_some());
        let opts = DisplayOpts {
            show_bth: true,
            show_other: true,
            ..Default::default()
        };
        assert_eq!(decode_frame(&frame, Duration::ZERO, &opts), "");
    }

    #[test]
    fn rocev2_render() {
        let mut envelope = vec![
            0x04, 0xc0, 0xff, 0xff, 0x00, 0x00, 0x01, 0x07, 0x80, 0x7b, 0x28, 0x94,
        ];
        let mut msg = [0u8; 44];
        msg[0] = 0x07;
        msg[1] = 0x2c;
        envelope.extend_from_slice(&msg);
        envelope.extend_from_slice(&[0; 4]);
        let frame = ipv4_frame(17, 4791, &envelope);

        let ts = Duration::new(3600 + 2 * 60 + 3, 4000);
        let out = decode_frame(&frame, ts, &DisplayOpts::default());
        assert_eq!(
            out,
            "01:02:03.000004 RoCEv2 10.0.0.1 -> 10.0.0.2 \
             (98:03:9b:ab:cd:ef -> 98:03:9b:12:34:56):\n\
             LLC Test Link: Type 7, Length: 44, Reply: false, \
             User Data: 0x00000000000000000000000000000000\n"
        );
    }
}
