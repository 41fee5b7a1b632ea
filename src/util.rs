use std::fs;
use std::process;


// Peak resident set of this process in KB, for the statistics log.
#[cfg(target_os = "linux")]
pub fn mem_used_peak() -> Option<usize> {
    let status = fs::read_to_string(format!("/proc/{}/status", process::id())).ok()?;
    let line = status.lines().find(|line| line.starts_with("VmPeak:"))?;
    line.split_whitespace().nth(1).and_then(|kb| kb.parse().ok())
}

#[cfg(not(target_os = "linux"))]
pub fn mem_used_peak() -> Option<usize> {
    None
}
