use std::time::Duration;

use super::sample::ChargeState;

/// The derived quantities produced by one tick, handed to the display
/// sink. Absent (`None`) fields mean the underlying counter was
/// unavailable or the quantity is undefined for the current inputs;
/// panels render those as "n/a".
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub cpu: Vec<CoreLoad>,
    pub memory: Option<MemoryStats>,
    pub battery: BatterySummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoreLoad {
    /// Display label: zero-padded two-digit core index ("C00".."C09",
    /// then "C10", ...).
    pub label: String,
    pub percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStats {
    pub used_gb: f64,
    pub free_gb: f64,
    pub total_gb: f64,
    pub used_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatterySummary {
    /// energy_now / energy_full, clamped to [0, 100].
    pub level_percent: Option<f64>,
    pub cycle_count: Option<i64>,
    pub state: ChargeState,
    /// Estimated time until charged (Charging) or until empty
    /// (Discharging). Absent when power draw is zero or unknown, or the
    /// state carries no estimate.
    pub time_remaining: Option<Duration>,
    pub power_draw_w: Option<f64>,
}
