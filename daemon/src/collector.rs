//! Process snapshot provider (reads /proc on Linux)

mod linux;

pub use linux::LinuxProcessCollector;

/// One live process as seen at snapshot time.
///
/// A record is only meaningful for the cycle that produced it: the process
/// may exit, and its pid may be handed to an unrelated process, at any
/// moment afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    /// OS-assigned identifier, not stable across pid reuse.
    pub pid: u32,
    /// Executable name as reported by the kernel (truncated to 15 bytes).
    pub name: String,
    /// UNIX timestamp, in seconds, at which the process started.
    pub start_time: u64,
}

pub trait ProcessCollector: Send + Sync {
    fn list_processes(&self) -> Vec<ProcessInfo>;
    fn get_process(&self, pid: u32) -> Option<ProcessInfo>;
}
