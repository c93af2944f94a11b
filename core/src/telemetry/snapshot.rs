//! telemetry/snapshot.rs
//! Immutable view of a codec's counters.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::CodecCounters;
use crate::telemetry::timers::StageTimes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub format: String,
    pub documents_written: u64,
    pub documents_read: u64,
    pub bytes_written: u64,
    pub bytes_read: u64,
    pub failed_writes: u64,
    pub failed_reads: u64,
    /// Session resets; one per encode or decode call, success or failure.
    pub session_resets: u64,
    pub stage_times: StageTimes,
}

impl CounterSnapshot {
    pub fn from(format: &str, counters: &CodecCounters, resets: u64, times: &StageTimes) -> Self {
        Self {
            format: format.to_string(),
            documents_written: counters.documents_written,
            documents_read: counters.documents_read,
            bytes_written: counters.bytes_written,
            bytes_read: counters.bytes_read,
            failed_writes: counters.failed_writes,
            failed_reads: counters.failed_reads,
            session_resets: resets,
            stage_times: times.clone(),
        }
    }

    /// Calls observed, counting failures.
    pub fn calls(&self) -> u64 {
        self.documents_written + self.documents_read + self.failed_writes + self.failed_reads
    }

    pub fn avg_written_len(&self) -> f64 {
        if self.documents_written == 0 {
            0.0
        } else {
            self.bytes_written as f64 / self.documents_written as f64
        }
    }
}
