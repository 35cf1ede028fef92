//! Canonical hex dumps of raw header and message bytes.
//!
//! Each line shows a 16-byte row: an 8-digit offset, the bytes in two
//! groups of eight, and an ASCII sidebar in which non-printable bytes appear
//! as `.`:
//!
//! ```text
//! 00000000  04 c0 ff ff 00 00 01 07  80 7b 28 94              |.........{(.|
//! ```

use std::fmt::Write;

const BYTES_PER_LINE: usize = 16;

/// Produce a hex dump of `data`. Empty input yields an empty string.
pub fn hex_dump(data: &[u8]) -> String {
    let mut out = String::with_capacity((data.len() / BYTES_PER_LINE + 1) * 79);
    for (line, row) in data.chunks(BYTES_PER_LINE).enumerate() {
        // Writing into a String never fails.
        let _ = write!(out, "{:08x}  ", line * BYTES_PER_LINE);
        for i in 0..BYTES_PER_LINE {
            match row.get(i) {
                Some(b) => {
                    let _ = write!(out, "{:02x} ", b);
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        out.extend(row.iter().map(|&b| printable(b)));
        out.push_str("|\n");
    }
    out
}

#[inline]
fn printable(b: u8) -> char {
    if (0x20..=0x7e).contains(&b) {
        b as char
    } else {
        '.'
    }
}
