/// One tick's worth of raw counter reads. Built fresh every sampling tick,
/// handed to the deriver, then discarded; no field survives across ticks.
///
/// `None` means the counter could not be read this tick ("unavailable"),
/// never that it was zero.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSample {
    /// Per-core busy percentage (0–100) averaged over the sampling window,
    /// in core order. None when the CPU source produced nothing.
    pub cpu_percent_per_core: Option<Vec<f32>>,
    pub memory: Option<RawMemory>,
    pub battery: RawBattery,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMemory {
    pub total_bytes: u64,
    pub free_bytes: u64,
    pub used_bytes: u64,
    pub used_percent: f32,
}

/// Raw battery attributes as read from the power-supply interface.
///
/// Energy and power counters keep their raw fixed-point value after the
/// two-character unit suffix was stripped; the deriver applies the
/// 1/100000 scale to reach watt-hours / watts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawBattery {
    pub cycle_count: Option<i64>,
    pub state: ChargeState,
    pub energy_now: Option<u64>,
    pub energy_full: Option<u64>,
    pub energy_full_design: Option<u64>,
    pub power_now: Option<u64>,
}

impl RawBattery {
    pub fn unavailable() -> Self {
        RawBattery {
            cycle_count: None,
            state: ChargeState::Unknown,
            energy_now: None,
            energy_full: None,
            energy_full_design: None,
            power_now: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChargeState {
    Charging,
    Discharging,
    NotCharging,
    #[default]
    Unknown,
}

impl ChargeState {
    /// Tolerant parse of the power-supply `status` attribute: whitespace
    /// trimmed, case-insensitive. Anything unrecognized (including "Full")
    /// is Unknown rather than a silently absorbed fallthrough.
    pub fn from_status_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "charging" => ChargeState::Charging,
            "discharging" => ChargeState::Discharging,
            "not charging" => ChargeState::NotCharging,
            _ => ChargeState::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChargeState::Charging => "Charging",
            ChargeState::Discharging => "Discharging",
            ChargeState::NotCharging => "Not charging",
            ChargeState::Unknown => "Unknown",
        }
    }
}
