//! The scan / evaluate / terminate loop

use crate::collector::{ProcessCollector, ProcessInfo};
use crate::config::{ConfigError, Policy};
use crate::detector;
use crate::executor::{ProcessKiller, TerminationOutcome};
use crate::reporter::Reporter;
use chrono::{Local, TimeZone};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::watch;
use tracing::debug;

/// Drives the monitoring cycles against an injected process collector,
/// killer and reporter. Holds no state across cycles beyond the policy:
/// eligibility is re-derived from a fresh snapshot every pass because pids
/// and start times can be recycled by the OS.
pub struct Monitor<C, K> {
    policy: Policy,
    collector: C,
    killer: K,
    reporter: Reporter,
}

impl<C, K> Monitor<C, K>
where
    C: ProcessCollector,
    K: ProcessKiller,
{
    /// Validates the policy once, so a zero lifetime or interval never
    /// reaches the loop.
    pub fn new(
        policy: Policy,
        collector: C,
        killer: K,
        reporter: Reporter,
    ) -> Result<Self, ConfigError> {
        policy.validate()?;
        Ok(Self {
            policy,
            collector,
            killer,
            reporter,
        })
    }

    /// One full pass: snapshot, filter by name, evaluate, terminate, report.
    ///
    /// Per-process failures (a process that vanished, or one the OS protects)
    /// are reported and skipped; only an unusable policy aborts.
    pub fn run_cycle(&mut self) -> Result<(), ConfigError> {
        let now = unix_now();
        let snapshot = self.collector.list_processes();
        let mut eligible = 0usize;

        for process in &snapshot {
            if !process.name.eq_ignore_ascii_case(&self.policy.process_name) {
                continue;
            }
            let Some(overstay) =
                detector::check(process, self.policy.max_lifetime_minutes, now)?
            else {
                debug!("{} (pid {}) is within its lifetime", process.name, process.pid);
                continue;
            };
            eligible += 1;
            self.reporter.report(&format!(
                "{} (pid {}) exceeded its maximum lifetime: started {}, {:.1} minute(s) ago",
                process.name,
                process.pid,
                format_start_time(process.start_time),
                overstay.elapsed_minutes(),
            ));
            let outcome = self.terminate(process);
            self.reporter.report(&describe_outcome(process, outcome));
        }

        if eligible == 0 {
            self.reporter.report(&format!(
                "no process named \"{}\" is eligible for removal; next scan in {} ms",
                self.policy.process_name, self.policy.poll_interval_millis,
            ));
        }
        Ok(())
    }

    /// Re-confirm identity right before the kill: the pid must still belong
    /// to the process we snapshotted (same name, same start time). Snapshot
    /// and kill are not atomic, so the pid may have been reused; a mismatch
    /// comes back as `NotFound` without a signal being sent. The window
    /// between this check and kill(2) itself stays open.
    fn terminate(&self, process: &ProcessInfo) -> TerminationOutcome {
        match self.collector.get_process(process.pid) {
            Some(live) if live.name == process.name && live.start_time == process.start_time => {
                self.killer.kill(process.pid)
            }
            _ => TerminationOutcome::NotFound,
        }
    }

    /// Run cycles until `stop` turns true. The interval sleep is
    /// interruptible, so a stop request arriving mid-sleep never waits out
    /// the full interval.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> Result<(), ConfigError> {
        self.reporter.report(&format!(
            "monitoring processes named \"{}\": maximum lifetime {} minute(s), scanning every {} ms",
            self.policy.process_name,
            self.policy.max_lifetime_minutes,
            self.policy.poll_interval_millis,
        ));

        loop {
            if *stop.borrow() {
                break;
            }
            self.run_cycle()?;

            tokio::select! {
                _ = tokio::time::sleep(self.policy.poll_interval()) => {}
                changed = stop.changed() => {
                    // A closed channel counts as a stop request.
                    if changed.is_err() || *stop.borrow() {
                        break;
                    }
                }
            }
        }

        self.reporter.report("stop requested; monitoring ended");
        Ok(())
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn format_start_time(secs: u64) -> String {
    Local
        .timestamp_opt(secs as i64, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("@{secs}"))
}

fn describe_outcome(process: &ProcessInfo, outcome: TerminationOutcome) -> String {
    match outcome {
        TerminationOutcome::Terminated => {
            format!("{} (pid {}) has been terminated", process.name, process.pid)
        }
        TerminationOutcome::NotFound => format!(
            "{} (pid {}) was already gone before it could be killed",
            process.name, process.pid
        ),
        TerminationOutcome::Denied => format!(
            "{} (pid {}) could not be terminated: permission denied",
            process.name, process.pid
        ),
    }
}
