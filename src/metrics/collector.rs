use std::path::PathBuf;
use std::time::Duration;

use sysinfo::System;
use tracing::warn;

use super::battery::BatteryReader;
use super::sample::{RawMemory, RawSample};

/// The sampling seam the scheduler is generic over. The real implementation
/// talks to the OS; tests substitute fakes.
pub trait MetricSource {
    /// Produce one best-effort raw sample. `cpu_window` is the window the
    /// per-core busy percentage is averaged over; the call is expected to
    /// take roughly that long. Never fails: unreadable counters come back
    /// as unavailable fields.
    fn sample(&mut self, cpu_window: Duration) -> impl Future<Output = RawSample>;
}

/// Raw counter provider backed by sysinfo (CPU, memory) and the
/// power-supply interface (battery). Pure I/O boundary; derivation lives
/// in [`super::derive`].
pub struct Collector {
    sys: System,
    battery: BatteryReader,
}

impl Collector {
    pub fn new(battery_path: impl Into<PathBuf>) -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        Collector {
            sys,
            battery: BatteryReader::new(battery_path),
        }
    }

    fn memory(&self) -> Option<RawMemory> {
        let total_bytes = self.sys.total_memory();
        if total_bytes == 0 {
            warn!("memory counters unavailable");
            return None;
        }
        let used_bytes = self.sys.used_memory();
        Some(RawMemory {
            total_bytes,
            free_bytes: self.sys.free_memory(),
            used_bytes,
            used_percent: used_bytes as f32 / total_bytes as f32 * 100.0,
        })
    }

    fn cpu_per_core(&self) -> Option<Vec<f32>> {
        let cpus = self.sys.cpus();
        if cpus.is_empty() {
            warn!("cpu counters unavailable");
            return None;
        }
        Some(cpus.iter().map(|cpu| cpu.cpu_usage()).collect())
    }
}

impl MetricSource for Collector {
    async fn sample(&mut self, cpu_window: Duration) -> RawSample {
        // Per-core busy percent is the delta between two refreshes spaced
        // by the sampling window. This await is the only part of a sample
        // that takes any time; dropping the future mid-window is harmless.
        self.sys.refresh_cpu_all();
        tokio::time::sleep(cpu_window).await;
        self.sys.refresh_cpu_all();
        self.sys.refresh_memory();

        RawSample {
            cpu_percent_per_core: self.cpu_per_core(),
            memory: self.memory(),
            battery: self.battery.read(),
        }
    }
}
