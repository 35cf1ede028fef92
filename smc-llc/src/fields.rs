use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

/// Assemble a big-endian unsigned integer from up to 8 bytes.
#[inline]
pub(crate) fn read_uint_from_be_bytes(buf: &[u8]) -> u64 {
    let mut out = [0; 8];
    assert!(buf.len() <= out.len());
    let start = out.len() - buf.len();
    out[start..].copy_from_slice(buf);
    u64::from_be_bytes(out)
}

/// Test the bits selected by `mask`.
#[inline]
pub(crate) fn flag(byte: u8, mask: u8) -> bool {
    byte & mask != 0
}

/// Extract the bit group selected by `mask`, shifted down to bit 0.
#[inline]
pub(crate) fn bits(byte: u8, mask: u8) -> u8 {
    debug_assert!(mask != 0);
    (byte & mask) >> mask.trailing_zeros()
}

/// Render an IPv6 address the way the capture tools print it: IPv4-mapped
/// addresses collapse to dotted quad.
#[inline]
pub(crate) fn canonical_ip(addr: Ipv6Addr) -> IpAddr {
    match addr.to_ipv4_mapped() {
        Some(v4) => IpAddr::V4(v4),
        None => IpAddr::V6(addr),
    }
}

/// Displays a byte run as `0x` followed by two hex digits per byte.
///
/// Reserved runs and opaque blobs are rendered this way, so leading zero
/// bytes stay visible: `[0, 0]` prints as `0x0000`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexBytes<'a>(pub &'a [u8]);

impl fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("0x")?;
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_read_uint_be() {
        assert_eq!(read_uint_from_be_bytes(&[0x00, 0x01, 0x07]), 263);
        assert_eq!(read_uint_from_be_bytes(&[0xff, 0xff]), 65535);
        assert_eq!(read_uint_from_be_bytes(&[0x7b, 0x28, 0x94]), 8071316);
        assert_eq!(
            read_uint_from_be_bytes(&[0x00, 0x00, 0x00, 0x0e, 0xef, 0x4d, 0x00, 0x00]),
            0xeef4d0000
        );
        assert_eq!(read_uint_from_be_bytes(&[]), 0);
    }

    #[test]
    fn test_bit_groups() {
        assert_eq!(flag(0xc0, 0x80), true);
        assert_eq!(flag(0x40, 0x80), false);
        assert_eq!(bits(0x30, 0x30), 3);
        assert_eq!(bits(0xa5, 0x0f), 5);
        assert_eq!(bits(0xa5, 0xf0), 0xa);
        assert_eq!(bits(0x7f, 0x40), 1);
    }

    #[test]
    fn test_hex_bytes() {
        assert_eq!(HexBytes(&[0, 0]).to_string(), "0x0000");
        assert_eq!(HexBytes(&[0xde, 0xad, 0x01]).to_string(), "0xdead01");
        assert_eq!(HexBytes(&[]).to_string(), "0x");
    }

    #[test]
    fn test_canonical_ip() {
        let v6: Ipv6Addr = "fe80::9a03:9bff:feab:cdef".parse().unwrap();
        assert_eq!(canonical_ip(v6).to_string(), "fe80::9a03:9bff:feab:cdef");

        let mapped = Ipv4Addr::new(192, 168, 0, 23).to_ipv6_mapped();
        assert_eq!(canonical_ip(mapped).to_string(), "192.168.0.23");
    }
}
