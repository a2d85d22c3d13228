//! Process-wide gauges exposed next to the request metrics.

use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub struct ProcessInfo {
    started: Instant,
    start_time_secs: f64,
}

impl Default for ProcessInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessInfo {
    pub fn new() -> Self {
        let start_time_secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs_f64();
        Self {
            started: Instant::now(),
            start_time_secs,
        }
    }

    /// Process series in the shape `ServiceMetrics::render` expects.
    pub fn gauges(&self) -> Vec<(&'static str, f64)> {
        let mut out = vec![
            ("process_start_time_seconds", self.start_time_secs.floor()),
            ("process_uptime_seconds", self.started.elapsed().as_secs_f64()),
        ];
        if let Some(rss) = resident_memory_bytes() {
            out.push(("process_resident_memory_bytes", rss as f64));
        }
        if let Some(cpu) = cpu_seconds() {
            out.push(("process_cpu_seconds_total", cpu));
        }
        if let Some(fds) = open_fds() {
            out.push(("process_open_fds", fds as f64));
        }
        out
    }
}

/// Kernel clock ticks per second as seen through `/proc` (USER_HZ).
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
const CLOCK_TICKS_PER_SEC: f64 = 100.0;

#[cfg(target_os = "linux")]
fn cpu_seconds() -> Option<f64> {
    let stat = std::fs::read_to_string("/proc/self/stat").ok()?;
    parse_cpu_seconds(&stat)
}

#[cfg(not(target_os = "linux"))]
fn cpu_seconds() -> Option<f64> {
    None
}

#[cfg(target_os = "linux")]
fn open_fds() -> Option<usize> {
    Some(std::fs::read_dir("/proc/self/fd").ok()?.count())
}

#[cfg(not(target_os = "linux"))]
fn open_fds() -> Option<usize> {
    None
}

/// User plus system time from `/proc/<pid>/stat` contents.
///
/// The command name (field 2) may contain spaces, so fields are counted
/// from the closing parenthesis: utime and stime are fields 14 and 15.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_cpu_seconds(stat: &str) -> Option<f64> {
    let rest = &stat[stat.rfind(')')? + 1..];
    let mut fields = rest.split_whitespace().skip(11);
    let utime: u64 = fields.next()?.parse().ok()?;
    let stime: u64 = fields.next()?.parse().ok()?;
    Some((utime + stime) as f64 / CLOCK_TICKS_PER_SEC)
}

#[cfg(target_os = "linux")]
fn resident_memory_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

#[cfg(not(target_os = "linux"))]
fn resident_memory_bytes() -> Option<u64> {
    None
}

/// Extract `VmRSS` (reported in kB) from `/proc/<pid>/status` contents.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|l| l.starts_with("VmRSS:"))?;
    let kb: u64 = line.split_whitespace().nth(1)?.parse().ok()?;
    Some(kb * 1024)
}
