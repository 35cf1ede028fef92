//! Text rendering of decoded headers and messages.
//!
//! Every decoded part implements [`Render`]. A single `write_to` per type
//! serves both output modes: the compact form skips reserved fields, the
//! verbose form writes them in the position they occupy on the wire.

use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

use crate::ether::MacAddr;
use crate::hexdump::hex_dump;
use crate::llc::MessageType;
use crate::roce::Roce;

/// A decoded part that can be rendered as an output line.
pub trait Render {
    /// Write the one-line representation, including the trailing newline.
    ///
    /// Reserved fields are included only if `verbose` is set.
    fn write_to(&self, out: &mut dyn fmt::Write, verbose: bool) -> fmt::Result;

    /// The raw bytes this part was decoded from.
    fn raw(&self) -> &[u8];

    /// The internal type tag of this part.
    fn layer_type(&self) -> MessageType;

    /// The compact line, without reserved fields.
    fn to_compact(&self) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.write_to(&mut out, false);
        out
    }

    /// The verbose line, with reserved fields interleaved.
    fn to_verbose(&self) -> String {
        let mut out = String::new();
        let _ = self.write_to(&mut out, true);
        out
    }

    /// A hex dump of [`Render::raw`].
    fn hex(&self) -> String {
        hex_dump(self.raw())
    }
}

/// Writes `Title: Name: value, Name: value, ...\n` lines.
///
/// Errors are latched like in `core::fmt::DebugStruct`: after the first
/// failure further entries are skipped and `finish` returns the error.
pub(crate) struct FieldList<'a> {
    out: &'a mut dyn fmt::Write,
    verbose: bool,
    first: bool,
    result: fmt::Result,
}

impl<'a> FieldList<'a> {
    pub(crate) fn new(out: &'a mut dyn fmt::Write, title: &str, verbose: bool) -> Self {
        let result = write!(out, "{}: ", title);
        FieldList {
            out,
            verbose,
            first: true,
            result,
        }
    }

    /// Append a preformatted entry.
    pub(crate) fn entry(&mut self, item: &dyn fmt::Display) -> &mut Self {
        if self.result.is_ok() {
            self.result = self.write_entry(item);
        }
        self
    }

    /// Append `name: value`.
    pub(crate) fn field(&mut self, name: &str, value: &dyn fmt::Display) -> &mut Self {
        self.entry(&format_args!("{}: {}", name, value))
    }

    /// Append `Reserved: value`, in verbose mode only.
    pub(crate) fn reserved(&mut self, value: &dyn fmt::Display) -> &mut Self {
        self.reserved_as("Reserved", value)
    }

    /// Append a reserved field under a custom label, in verbose mode only.
    pub(crate) fn reserved_as(&mut self, name: &str, value: &dyn fmt::Display) -> &mut Self {
        if self.verbose {
            self.field(name, value);
        }
        self
    }

    pub(crate) fn finish(&mut self) -> fmt::Result {
        self.result?;
        self.out.write_char('\n')
    }

    fn write_entry(&mut self, item: &dyn fmt::Display) -> fmt::Result {
        if !self.first {
            self.out.write_str(", ")?;
        }
        self.first = false;
        write!(self.out, "{}", item)
    }
}

/// Display switches for [`render`]. All default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DisplayOpts {
    /// Show the Global Routing Header of RoCEv1 packets.
    pub show_grh: bool,
    /// Show the Base Transport Header.
    pub show_bth: bool,
    /// Show payloads that are not LLC/CDC messages.
    pub show_other: bool,
    /// Include reserved fields.
    pub show_reserved: bool,
    /// Append a hex dump after every rendered part.
    pub show_hex: bool,
}

/// Capture metadata printed in the context header of each packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketMeta {
    /// Capture time since the Unix epoch.
    pub timestamp: Duration,
    /// Link-layer source.
    pub src_mac: MacAddr,
    /// Link-layer destination.
    pub dst_mac: MacAddr,
    /// Network-layer source (from the GRH for RoCEv1, the IP header for RoCEv2).
    pub src_ip: IpAddr,
    /// Network-layer destination.
    pub dst_ip: IpAddr,
}

/// Renders a capture timestamp as UTC wall-clock time with microseconds.
#[derive(Debug, Clone, Copy)]
struct TimeOfDay(Duration);

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        write!(
            f,
            "{:02}:{:02}:{:02}.{:06}",
            (secs / 3600) % 24,
            (secs / 60) % 60,
            secs % 60,
            self.0.subsec_micros()
        )
    }
}

/// Render the visible parts of `roce`, without the context header.
///
/// The GRH is subject to `show_grh`, the BTH to `show_bth`. The LLC part is
/// always shown unless it is an `Other` payload and `show_other` is unset.
pub fn render_parts(roce: &Roce, opts: &DisplayOpts) -> String {
    let mut out = String::new();
    if let Some(grh) = roce.grh.as_ref().filter(|_| opts.show_grh) {
        push_part(&mut out, grh, opts);
    }
    if opts.show_bth {
        push_part(&mut out, &roce.bth, opts);
    }
    if roce.llc.msg_type() != MessageType::OTHER || opts.show_other {
        push_part(&mut out, &roce.llc, opts);
    }
    out
}

/// Render a decoded packet.
///
/// Returns an empty string if every part is filtered out; the caller must
/// then print nothing at all for this packet.
pub fn render(roce: &Roce, meta: &PacketMeta, opts: &DisplayOpts) -> String {
    let body = render_parts(roce, opts);
    if body.is_empty() {
        return body;
    }
    format!(
        "{} {} {} -> {} ({} -> {}):\n{}",
        TimeOfDay(meta.timestamp),
        roce.version,
        meta.src_ip,
        meta.dst_ip,
        meta.src_mac,
        meta.dst_mac,
        body
    )
}

fn push_part(out: &mut String, part: &dyn Render, opts: &DisplayOpts) {
    let _ = part.write_to(out, opts.show_reserved);
    if opts.show_hex {
        out.push_str(&part.hex());
    }
}
