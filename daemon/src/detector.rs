//! Lifetime eligibility evaluation

use crate::collector::ProcessInfo;
use crate::config::ConfigError;

/// Evidence that a process has outlived the policy's maximum lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overstay {
    /// Seconds between the process start and the evaluation instant.
    pub elapsed_secs: u64,
}

impl Overstay {
    /// Elapsed time in fractional minutes, for reporting.
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed_secs as f64 / 60.0
    }
}

/// Decide whether `process` has exceeded `max_lifetime_minutes` as of
/// `now_secs`.
///
/// Pure function of its inputs, so tests can pin the clock. A process is
/// eligible the instant its elapsed time reaches the threshold. A start time
/// in the future (clock skew, or an inconsistent value from the OS) is never
/// eligible.
pub fn check(
    process: &ProcessInfo,
    max_lifetime_minutes: u64,
    now_secs: u64,
) -> Result<Option<Overstay>, ConfigError> {
    if max_lifetime_minutes == 0 {
        return Err(ConfigError::ZeroLifetime);
    }
    let Some(elapsed_secs) = now_secs.checked_sub(process.start_time) else {
        return Ok(None);
    };
    if elapsed_secs >= max_lifetime_minutes.saturating_mul(60) {
        Ok(Some(Overstay { elapsed_secs }))
    } else {
        Ok(None)
    }
}
