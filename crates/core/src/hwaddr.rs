//! Hardware identity resolution.
//!
//! The session is identified on the network by a 6-byte hardware address.
//! It is read once at startup from the host's interface identity files:
//!
//! ```text
//! /sys/class/net/eth0/address    (primary wired)
//! /sys/class/net/wlan0/address   (primary wireless)
//! ```
//!
//! The first source that yields a non-empty value wins. No retries.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{HwAddrError, MalformedKind};

pub const HW_ADDR_LEN: usize = 6;

/// Interface identity sources, in priority order.
pub const DEFAULT_SOURCES: [&str; 2] = [
    "/sys/class/net/eth0/address",
    "/sys/class/net/wlan0/address",
];

/// A 6-byte hardware (MAC) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HwAddr([u8; HW_ADDR_LEN]);

impl HwAddr {
    /// Used when no interface address can be resolved.
    pub const FALLBACK: HwAddr = HwAddr([0x48, 0x5d, 0x60, 0x7c, 0xee, 0x22]);

    pub const fn new(bytes: [u8; HW_ADDR_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HW_ADDR_LEN] {
        &self.0
    }
}

impl fmt::Display for HwAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl FromStr for HwAddr {
    type Err = HwAddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// Parse a colon- or hyphen-delimited hex address.
///
/// Pairs are consumed positionally every third character, so the
/// delimiter itself is never inspected: `48:5d:60:7c:ee:22` and
/// `48-5d-60-7c-ee-22` parse identically.
pub fn parse(text: &str) -> Result<HwAddr, HwAddrError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(HwAddrError::Empty);
    }

    let raw = text.as_bytes();
    let mut bytes = Vec::with_capacity(HW_ADDR_LEN);
    for (pos, start) in (0..raw.len()).step_by(3).enumerate() {
        let pair = &raw[start..(start + 2).min(raw.len())];
        if !pair.iter().all(u8::is_ascii_hexdigit) {
            return Err(HwAddrError::Malformed {
                kind: MalformedKind::BadPair(pos),
            });
        }
        let value = pair
            .iter()
            .fold(0u8, |acc, &c| (acc << 4) | hex_value(c));
        bytes.push(value);
    }

    let bytes: [u8; HW_ADDR_LEN] = bytes.as_slice().try_into().map_err(|_| HwAddrError::Malformed {
        kind: MalformedKind::WrongLength(bytes.len()),
    })?;
    Ok(HwAddr(bytes))
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

/// Reads the hardware address from an ordered list of identity files.
#[derive(Debug, Clone)]
pub struct Resolver {
    sources: Vec<PathBuf>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::with_sources(DEFAULT_SOURCES)
    }
}

impl Resolver {
    pub fn with_sources<I, P>(sources: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            sources: sources
                .into_iter()
                .map(|p| p.as_ref().to_path_buf())
                .collect(),
        }
    }

    /// Return the raw text of the first readable, non-empty source.
    pub fn read_first(&self) -> Result<String, HwAddrError> {
        let mut saw_empty = false;
        for path in &self.sources {
            match fs::read_to_string(path) {
                Ok(contents) => match contents.split_whitespace().next() {
                    Some(addr) => {
                        tracing::debug!(source = %path.display(), addr, "read interface address");
                        return Ok(addr.to_string());
                    }
                    None => saw_empty = true,
                },
                Err(e) => {
                    tracing::trace!(
                        source = %path.display(),
                        error = %e,
                        "interface address unavailable"
                    );
                }
            }
        }
        Err(if saw_empty {
            HwAddrError::Empty
        } else {
            HwAddrError::NoSource
        })
    }

    /// Read and parse the first available address.
    pub fn resolve(&self) -> Result<HwAddr, HwAddrError> {
        parse(&self.read_first()?)
    }
}

/// Resolve from the default interface sources.
pub fn resolve() -> Result<HwAddr, HwAddrError> {
    Resolver::default().resolve()
}
