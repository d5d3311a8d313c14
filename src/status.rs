//! Result status bitmask
//!
//! The widget and the persisted field value share one status integer. Each
//! bit is an independent facet except the three result bits (single result,
//! multiple results, not found), which are mutually exclusive. Only the
//! `mark_*` transitions may set a result bit.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

bitflags! {
    /// Individual status bits with their canonical values
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Flag: u32 {
        const ON = 1;
        const SINGLE_RESULT = 2;
        const MULTIPLE_RESULTS = 4;
        /// The value came from autocomplete or reverse lookup; the server
        /// must not geocode it again on save.
        const SKIP_GEOCODING = 8;
        const NOT_FOUND = 16;
        const ERROR = 128;
    }
}

/// The three mutually exclusive result bits
const RESULT_MASK: Flag = Flag::SINGLE_RESULT
    .union(Flag::MULTIPLE_RESULTS)
    .union(Flag::NOT_FOUND);

/// Which result bit is currently set, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultState {
    None,
    Single,
    Multiple,
    NotFound,
}

/// Widget status bitmask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusFlags {
    bits: Flag,
}

impl StatusFlags {
    /// Status with no bit set
    pub fn empty() -> Self {
        Self { bits: Flag::empty() }
    }

    /// Status with only `ON` set
    pub fn on() -> Self {
        Self { bits: Flag::ON }
    }

    /// Restore a status from its canonical integer
    ///
    /// Unknown bits are dropped. If more than one result bit is set the most
    /// pessimistic one wins: not found, then multiple, then single.
    pub fn from_persisted(raw: u32) -> Self {
        let mut bits = Flag::from_bits_truncate(raw);
        if bits.contains(Flag::NOT_FOUND) {
            bits.remove(Flag::SINGLE_RESULT | Flag::MULTIPLE_RESULTS);
        } else if bits.contains(Flag::MULTIPLE_RESULTS) {
            bits.remove(Flag::SINGLE_RESULT);
        }
        Self { bits }
    }

    /// Canonical integer value
    pub fn bits(&self) -> u32 {
        self.bits.bits()
    }

    /// Replace all bits. Result bits in `flags` are ignored, so this also
    /// resets the result state.
    pub fn set(&mut self, flags: Flag) -> &mut Self {
        self.bits = flags.difference(RESULT_MASK);
        self
    }

    /// Bitwise OR, excluding result bits
    pub fn add(&mut self, flags: Flag) -> &mut Self {
        self.bits.insert(flags.difference(RESULT_MASK));
        self
    }

    /// Bitwise AND with the complement
    pub fn remove(&mut self, flags: Flag) -> &mut Self {
        self.bits.remove(flags);
        self
    }

    /// True if any of `flags` is set
    pub fn has(&self, flags: Flag) -> bool {
        self.bits.intersects(flags)
    }

    pub fn mark_single_result(&mut self) -> &mut Self {
        self.remove(Flag::MULTIPLE_RESULTS | Flag::NOT_FOUND);
        self.bits.insert(Flag::SINGLE_RESULT);
        self
    }

    pub fn mark_multiple_results(&mut self) -> &mut Self {
        self.remove(Flag::SINGLE_RESULT | Flag::NOT_FOUND);
        self.bits.insert(Flag::MULTIPLE_RESULTS);
        self
    }

    pub fn mark_not_found(&mut self) -> &mut Self {
        self.remove(Flag::SINGLE_RESULT | Flag::MULTIPLE_RESULTS);
        self.bits.insert(Flag::NOT_FOUND);
        self
    }

    /// Apply the result transition matching a match count
    pub fn mark_total(&mut self, total: usize) -> &mut Self {
        match total {
            0 => self.mark_not_found(),
            1 => self.mark_single_result(),
            _ => self.mark_multiple_results(),
        }
    }

    pub fn result(&self) -> ResultState {
        if self.bits.contains(Flag::NOT_FOUND) {
            ResultState::NotFound
        } else if self.bits.contains(Flag::MULTIPLE_RESULTS) {
            ResultState::Multiple
        } else if self.bits.contains(Flag::SINGLE_RESULT) {
            ResultState::Single
        } else {
            ResultState::None
        }
    }

    pub fn skip_geocoding(&self) -> bool {
        self.has(Flag::SKIP_GEOCODING)
    }

    /// Names of the set bits, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        self.bits.iter_names().map(|(name, _)| flag_label(name)).collect()
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::on()
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.names();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(" | "))
        }
    }
}

impl Serialize for StatusFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for StatusFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = u32::deserialize(deserializer)?;
        Ok(Self::from_persisted(raw))
    }
}

fn flag_label(name: &str) -> &'static str {
    match name {
        "ON" => "on",
        "SINGLE_RESULT" => "single_result",
        "MULTIPLE_RESULTS" => "multiple_results",
        "SKIP_GEOCODING" => "skip_geocoding",
        "NOT_FOUND" => "not_found",
        "ERROR" => "error",
        _ => "unknown",
    }
}

/// Integer values used for each bit in the hidden status form field
///
/// Hosts that store the status with different bit positions can override
/// these; the defaults match the canonical `Flag` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBits {
    pub on: u32,
    pub single_result: u32,
    pub multiple_results: u32,
    pub skip_geocoding: u32,
    pub not_found: u32,
    pub error: u32,
}

impl Default for StatusBits {
    fn default() -> Self {
        Self {
            on: Flag::ON.bits(),
            single_result: Flag::SINGLE_RESULT.bits(),
            multiple_results: Flag::MULTIPLE_RESULTS.bits(),
            skip_geocoding: Flag::SKIP_GEOCODING.bits(),
            not_found: Flag::NOT_FOUND.bits(),
            error: Flag::ERROR.bits(),
        }
    }
}

impl StatusBits {
    fn pairs(&self) -> [(Flag, u32); 6] {
        [
            (Flag::ON, self.on),
            (Flag::SINGLE_RESULT, self.single_result),
            (Flag::MULTIPLE_RESULTS, self.multiple_results),
            (Flag::SKIP_GEOCODING, self.skip_geocoding),
            (Flag::NOT_FOUND, self.not_found),
            (Flag::ERROR, self.error),
        ]
    }

    /// Encode a status into the host's integer representation
    pub fn encode(&self, status: StatusFlags) -> u32 {
        self.pairs()
            .iter()
            .filter(|(flag, _)| status.bits.contains(*flag))
            .fold(0, |acc, (_, value)| acc | value)
    }

    /// Decode the host's integer representation
    pub fn decode(&self, raw: u32) -> StatusFlags {
        let canonical = self
            .pairs()
            .iter()
            .filter(|(_, value)| *value != 0 && raw & value == *value)
            .fold(0, |acc, (flag, _)| acc | flag.bits());
        StatusFlags::from_persisted(canonical)
    }
}
