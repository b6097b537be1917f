//! Pure derivation from raw counter reads to display-ready quantities.
//! No I/O, no state: `derive` is total over every well-formed
//! [`RawSample`] and bit-identical for identical input.

use std::time::Duration;

use super::sample::{ChargeState, RawSample};
use super::snapshot::{BatterySummary, CoreLoad, MemoryStats, Snapshot};

/// Scale between the raw fixed-point energy/power counters (after unit
/// suffix stripping) and watt-hours / watts. Must stay exactly 100000 for
/// compatibility with the power-supply counter format.
pub const RAW_COUNTER_SCALE: f64 = 100_000.0;

const BYTES_IN_GB: f64 = (1u64 << 30) as f64;

pub fn derive(raw: &RawSample) -> Snapshot {
    Snapshot {
        cpu: derive_cpu(raw.cpu_percent_per_core.as_deref()),
        memory: raw.memory.map(|mem| MemoryStats {
            used_gb: mem.used_bytes as f64 / BYTES_IN_GB,
            free_gb: mem.free_bytes as f64 / BYTES_IN_GB,
            total_gb: mem.total_bytes as f64 / BYTES_IN_GB,
            used_percent: mem.used_percent,
        }),
        battery: derive_battery(raw),
    }
}

fn derive_cpu(per_core: Option<&[f32]>) -> Vec<CoreLoad> {
    per_core
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(index, &percent)| CoreLoad {
            label: format!("C{index:02}"),
            percent,
        })
        .collect()
}

fn derive_battery(raw: &RawSample) -> BatterySummary {
    let battery = &raw.battery;

    let level_percent = match (battery.energy_now, battery.energy_full) {
        (Some(now), Some(full)) if full > 0 => {
            Some((now as f64 / full as f64 * 100.0).clamp(0.0, 100.0))
        }
        _ => None,
    };

    BatterySummary {
        level_percent,
        cycle_count: battery.cycle_count,
        state: battery.state,
        time_remaining: time_remaining(battery.state, raw),
        power_draw_w: power_draw_w(battery.state, battery.power_now),
    }
}

/// Whole-second estimate from instantaneous power draw. Absent whenever
/// the estimate would be undefined: zero or unknown power, a missing
/// energy counter, or a state with nothing to estimate.
fn time_remaining(state: ChargeState, raw: &RawSample) -> Option<Duration> {
    let battery = &raw.battery;
    let power = match battery.power_now {
        Some(power) if power > 0 => power as f64,
        _ => return None,
    };

    let hours = match state {
        ChargeState::Charging => {
            let now = battery.energy_now? as f64;
            let design = battery.energy_full_design? as f64;
            ((design - now) / power).max(0.0)
        }
        ChargeState::Discharging => battery.energy_now? as f64 / power,
        ChargeState::NotCharging | ChargeState::Unknown => return None,
    };

    Some(Duration::from_secs((hours * 3600.0) as u64))
}

fn power_draw_w(state: ChargeState, power_now: Option<u64>) -> Option<f64> {
    if state == ChargeState::NotCharging {
        return None;
    }
    power_now.map(|raw| raw as f64 / RAW_COUNTER_SCALE)
}
