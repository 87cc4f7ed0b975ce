//! Pass statistics and progress reports.

use std::fmt;
use std::time::{Duration, Instant};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportTag {
    Started,
    Running,
    Ended,
}

impl ReportTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Started => "started",
            Self::Running => "running",
            Self::Ended => "ended",
        }
    }
}

impl fmt::Display for ReportTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counters of one pass. Malformed file names count in neither.
#[derive(Clone, Debug)]
pub struct PassStats {
    pub successes: u64,
    pub errors: u64,
    /// Chunks attempted since the previous report.
    pub total_since_last_reported: u64,
    started_at: Instant,
    last_report_at: Instant,
}

impl PassStats {
    pub fn start(now: Instant) -> Self {
        Self {
            successes: 0,
            errors: 0,
            total_since_last_reported: 0,
            started_at: now,
            last_report_at: now,
        }
    }

    pub fn record_success(&mut self) {
        self.successes += 1;
        self.total_since_last_reported += 1;
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
        self.total_since_last_reported += 1;
    }

    pub fn attempted(&self) -> u64 {
        self.successes + self.errors
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn report_due(&self, report_interval: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_report_at) >= report_interval
    }

    /// Build a report and start a new reporting window.
    pub fn report(&mut self, tag: ReportTag, pass: u64, now: Instant) -> ProgressReport {
        let window = now.saturating_duration_since(self.last_report_at).as_secs_f64();
        let rate = if window > 0.0 {
            self.total_since_last_reported as f64 / window
        } else {
            0.0
        };

        self.total_since_last_reported = 0;
        self.last_report_at = now;

        ProgressReport {
            tag,
            current_time: OffsetDateTime::now_utc(),
            elapsed: self.elapsed(now),
            pass,
            errors: self.errors,
            chunks: self.attempted(),
            rate,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProgressReport {
    pub tag: ReportTag,
    pub current_time: OffsetDateTime,
    /// Time since the pass started.
    pub elapsed: Duration,
    /// Passes completed before this one.
    pub pass: u64,
    pub errors: u64,
    /// Chunks attempted so far in this pass.
    pub chunks: u64,
    /// Chunks per second since the previous report.
    pub rate: f64,
}

impl ProgressReport {
    pub fn log(&self, volume_id: &str) {
        let current_time = self
            .current_time
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.current_time.unix_timestamp().to_string());
        tracing::info!(
            volume_id = %volume_id,
            tag = %self.tag,
            current_time = %current_time,
            elapsed_secs = self.elapsed.as_secs(),
            pass = self.pass,
            errors = self.errors,
            chunks = self.chunks,
            rate = format_args!("{:.2}", self.rate),
            "Indexing progress"
        );
    }
}
