//! Print the SMC-R LLC and CDC messages found in captured RoCE frames.
//!
//! Frames are read as hex strings, one per line, from a file or stdin. A
//! line may start with a `seconds.micros` capture timestamp separated from
//! the frame by whitespace:
//!
//! ```text
//! # timestamp       frame
//! 1602147018.000042 0000000000000000000000008915602000...
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Set `RUST_LOG` to
//! see why a line produced no output.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use smc_llc::{decode_frame, DisplayOpts};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn command() -> clap::Command {
    clap::Command::new("smc-llc-dump")
        .about("Print SMC-R LLC/CDC messages from hex-encoded RoCE frames")
        .arg(
            clap::arg!(-f --file <FILE> "Read frames from FILE instead of stdin")
                .required(false)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(clap::arg!(--"with-grh" "Show GRH of RoCEv1 packets"))
        .arg(clap::arg!(--"with-bth" "Show BTH of RoCE packets"))
        .arg(clap::arg!(--"with-other" "Show other payloads than LLC/CDC messages"))
        .arg(clap::arg!(--"with-reserved" "Show reserved message fields"))
        .arg(clap::arg!(--"with-hex" "Show hex dumps of messages"))
}

fn display_opts(matches: &clap::ArgMatches) -> DisplayOpts {
    DisplayOpts {
        show_grh: matches.get_flag("with-grh"),
        show_bth: matches.get_flag("with-bth"),
        show_other: matches.get_flag("with-other"),
        show_reserved: matches.get_flag("with-reserved"),
        show_hex: matches.get_flag("with-hex"),
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let matches = command().get_matches();
    let opts = display_opts(&matches);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match matches.get_one::<PathBuf>("file") {
        Some(path) => match File::open(path) {
            Ok(file) => writeln!(out, "Reading packets from file {}:", path.display())
                .and_then(|_| dump(BufReader::new(file), &mut out, &opts)),
            Err(err) => {
                eprintln!("smc-llc-dump: {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            }
        },
        None => dump(io::stdin().lock(), &mut out, &opts),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // The reader went away, e.g. `smc-llc-dump | head`.
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("smc-llc-dump: {}", err);
            ExitCode::FAILURE
        }
    }
}

/// Decode every frame line of `input` and write the rendered packets to
/// `out`.
fn dump<R: BufRead, W: Write>(input: R, out: &mut W, opts: &DisplayOpts) -> io::Result<()> {
    for (idx, line) in input.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (timestamp, frame) = match parse_line(line) {
            Some(parsed) => parsed,
            None => {
                warn!(line = idx + 1, "skipping malformed frame");
                continue;
            }
        };
        let text = decode_frame(&frame, timestamp, opts);
        if text.is_empty() {
            debug!(line = idx + 1, len = frame.len(), "no output for frame");
            continue;
        }
        out.write_all(text.as_bytes())?;
    }
    out.flush()
}

/// Split a line into its capture timestamp and frame bytes.
///
/// The first token is a timestamp if it contains a `.`. Whitespace between
/// hex digits is allowed.
fn parse_line(line: &str) -> Option<(Duration, Vec<u8>)> {
    let (timestamp, hex) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) if first.contains('.') => (parse_timestamp(first)?, rest),
        _ => (Duration::ZERO, line),
    };
    let hex: String = hex.split_whitespace().collect();
    Some((timestamp, parse_hex(&hex)?))
}

fn parse_timestamp(s: &str) -> Option<Duration> {
    let (secs, frac) = s.split_once('.')?;
    if !frac.bytes().all(|b| b.is_ascii_digit()) || frac.len() > 9 {
        return None;
    }
    let secs = secs.parse::<u64>().ok()?;
    let nanos = format!("{:0<9}", frac).parse::<u32>().ok()?;
    Some(Duration::new(secs, nanos))
}

fn parse_hex(s: &str) -> Option<Vec<u8>> {
    if s.is_empty() || s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
