use std::path::{Path, PathBuf};

use tracing::warn;

use super::sample::{ChargeState, RawBattery};

/// Length of the trailing unit suffix on energy/power counter files.
const UNIT_SUFFIX_LEN: usize = 2;

/// Reads raw battery attributes from a Linux-style power-supply directory
/// (normally `/sys/class/power_supply/BAT0`). The root is injectable so
/// tests can point it at a temp directory.
///
/// Every read is best-effort: a missing file, a permission error, or
/// malformed numeric text degrades that one field to unavailable and logs
/// a warning; it never fails the sample.
pub struct BatteryReader {
    root: PathBuf,
}

impl BatteryReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        BatteryReader { root: root.into() }
    }

    pub fn read(&self) -> RawBattery {
        let state = match self.read_attr("status") {
            Some(text) => ChargeState::from_status_text(&text),
            None => ChargeState::Unknown,
        };

        RawBattery {
            cycle_count: self.read_plain_int("cycle_count"),
            state,
            energy_now: self.read_counter("energy_now"),
            energy_full: self.read_counter("energy_full"),
            energy_full_design: self.read_counter("energy_full_design"),
            power_now: self.read_counter("power_now"),
        }
    }

    fn read_attr(&self, name: &str) -> Option<String> {
        let path = self.root.join(name);
        match std::fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(err) => {
                warn!(attr = name, path = %path.display(), %err, "battery attribute unavailable");
                None
            }
        }
    }

    /// Fixed-point energy/power counter: the file carries a two-character
    /// trailing unit suffix which is stripped before parsing.
    fn read_counter(&self, name: &str) -> Option<u64> {
        let text = self.read_attr(name)?;
        match parse_suffixed_counter(&text) {
            Some(value) => Some(value),
            None => {
                warn!(attr = name, raw = text.trim(), "malformed battery counter");
                None
            }
        }
    }

    /// Plain integer attribute (no unit suffix), e.g. `cycle_count`.
    fn read_plain_int(&self, name: &str) -> Option<i64> {
        let text = self.read_attr(name)?;
        match text.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(attr = name, raw = text.trim(), "malformed battery attribute");
                None
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Strips the fixed two-character unit suffix, then any remaining trailing
/// non-digit characters, and parses what is left. Returns None for input
/// that has no digits once stripped.
fn parse_suffixed_counter(text: &str) -> Option<u64> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= UNIT_SUFFIX_LEN {
        return None;
    }
    let stripped: String = chars[..chars.len() - UNIT_SUFFIX_LEN].iter().collect();
    let digits = stripped.trim_end_matches(|c: char| !c.is_ascii_digit());
    if digits.is_empty() || digits.chars().any(|c| !c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
