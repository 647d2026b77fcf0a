//! Host and process health metrics
//!
//! Collects a point-in-time snapshot of OS and process counters. Collection
//! blocks for the CPU sampling interval, so request handlers must run it on
//! a blocking-capable worker, never on the async dispatch path. Metrics a
//! platform cannot provide are reported as zero instead of failing.

use std::time::Instant;

use serde::Serialize;
use sysinfo::{Disks, Pid, System};

/// Point-in-time snapshot of host and process metrics
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Host identifier
    pub server_id: String,
    /// Global CPU usage percent
    pub cpu: f32,
    /// Used memory percent
    pub memory: f64,
    /// Used disk percent of the root mount
    pub disk: f64,
    /// Seconds since service start
    pub uptime: f64,
    /// 1/5/15 minute load averages
    pub load_avg: LoadAvgRecord,
    /// Thread count of this process
    pub threads: usize,
    /// Resident memory of this process in MiB
    #[serde(rename = "processMemoryMB")]
    pub process_memory_mb: f64,
    /// Always true when the endpoint is reachable
    pub active: bool,
}

/// Load averages as reported by the OS, zeros where unavailable
#[derive(Debug, Clone, Serialize)]
pub struct LoadAvgRecord {
    #[serde(rename = "1m")]
    pub one: f64,
    #[serde(rename = "5m")]
    pub five: f64,
    #[serde(rename = "15m")]
    pub fifteen: f64,
}

/// Produces [`HealthRecord`] snapshots for the health endpoint
pub struct HealthReporter {
    server_id: String,
    started: Instant,
}

impl HealthReporter {
    /// Create a reporter; service uptime counts from this moment
    pub fn new() -> Self {
        Self {
            server_id: System::host_name().unwrap_or_else(|| "unknown".to_string()),
            started: Instant::now(),
        }
    }

    /// Host identifier reported in `serverId` and the `X-Server-ID` header
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Collect a fresh snapshot.
    ///
    /// Blocks for at least `sysinfo::MINIMUM_CPU_UPDATE_INTERVAL` while the
    /// CPU usage sample settles.
    pub fn collect(&self) -> HealthRecord {
        let mut sys = System::new_all();

        // Two refreshes separated by the minimum interval give a usable
        // CPU figure; a single read always reports zero.
        sys.refresh_cpu_usage();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        sys.refresh_cpu_usage();
        let cpu = sys.global_cpu_usage();

        let memory = percent(sys.used_memory() as f64, sys.total_memory() as f64);

        let disks = Disks::new_with_refreshed_list();
        let disk = disks
            .list()
            .iter()
            .find(|d| d.mount_point() == std::path::Path::new("/"))
            .or_else(|| disks.list().first())
            .map(|d| {
                let total = d.total_space() as f64;
                percent(total - d.available_space() as f64, total)
            })
            .unwrap_or(0.0);

        let load = System::load_average();

        let pid = Pid::from_u32(std::process::id());
        let (threads, process_memory_mb) = sys
            .process(pid)
            .map(|proc| {
                let threads = proc.tasks().map(|tasks| tasks.len()).unwrap_or(0);
                let memory_mb = proc.memory() as f64 / (1024.0 * 1024.0);
                (threads, memory_mb)
            })
            .unwrap_or((0, 0.0));

        HealthRecord {
            server_id: self.server_id.clone(),
            cpu,
            memory,
            disk,
            uptime: self.started.elapsed().as_secs_f64(),
            load_avg: LoadAvgRecord {
                one: load.one,
                five: load.five,
                fifteen: load.fifteen,
            },
            threads,
            process_memory_mb,
            active: true,
        }
    }
}

impl Default for HealthReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn percent(used: f64, total: f64) -> f64 {
    if total > 0.0 { used / total * 100.0 } else { 0.0 }
}
