use super::{ProcessCollector, ProcessInfo};
use std::fs;

pub struct LinuxProcessCollector {
    clock_ticks: u64,
    boot_time: u64,
}

impl LinuxProcessCollector {
    pub fn new() -> Self {
        let clock_ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) }.max(1) as u64;
        Self {
            clock_ticks,
            boot_time: Self::read_boot_time(),
        }
    }

    fn read_boot_time() -> u64 {
        let stat = fs::read_to_string("/proc/stat").unwrap_or_default();
        for line in stat.lines() {
            if let Some(rest) = line.strip_prefix("btime ") {
                return rest.trim().parse().unwrap_or(0);
            }
        }
        0
    }

    fn parse_process(&self, pid: u32) -> Option<ProcessInfo> {
        let stat = fs::read_to_string(format!("/proc/{}/stat", pid)).ok()?;

        // comm sits in parentheses and may itself contain spaces or parens,
        // so it must be cut out before splitting the numeric fields.
        let open = stat.find('(')?;
        let close = stat.rfind(')')?;
        let name = stat.get(open + 1..close)?.to_string();
        let fields: Vec<&str> = stat.get(close + 1..)?.split_whitespace().collect();

        // fields[0] is the state (field 3 of the stat line); the start time
        // in clock ticks since boot is field 22.
        let start_ticks: u64 = fields.get(19)?.parse().ok()?;

        Some(ProcessInfo {
            pid,
            name,
            start_time: self.boot_time + start_ticks / self.clock_ticks,
        })
    }
}

impl Default for LinuxProcessCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessCollector for LinuxProcessCollector {
    fn list_processes(&self) -> Vec<ProcessInfo> {
        let mut processes = Vec::new();
        if let Ok(entries) = fs::read_dir("/proc") {
            for entry in entries.flatten() {
                if let Some(name) = entry.file_name().to_str() {
                    if let Ok(pid) = name.parse::<u32>() {
                        if let Some(info) = self.parse_process(pid) {
                            processes.push(info);
                        }
                    }
                }
            }
        }
        processes
    }

    fn get_process(&self, pid: u32) -> Option<ProcessInfo> {
        self.parse_process(pid)
    }
}
