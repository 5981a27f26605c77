use std::time::{Duration, Instant};

use tracing::info;

use crate::Opcode;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct OpcodeStats {
    elapsed: Duration,
    count: u64,
}

impl OpcodeStats {
    fn record_time(&mut self, elapsed: Duration) {
        self.elapsed += elapsed;
        self.count += 1;
    }

    fn average(&self) -> Duration {
        match u32::try_from(self.count) {
            Ok(0) => Duration::ZERO,
            Ok(count) => self.elapsed / count,
            Err(_) => self.elapsed.div_f64(self.count as f64),
        }
    }
}

/// Per-opcode dispatch counts and time spent, accumulated across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchStats {
    stats: [OpcodeStats; Opcode::OP_COUNT],
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchStats {
    pub fn new() -> Self {
        Self {
            stats: [OpcodeStats::default(); Opcode::OP_COUNT],
        }
    }

    /// Runs `f` and charges its duration to `opcode`.
    pub(crate) fn record<T>(&mut self, opcode: Opcode, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.stats[u8::from(opcode) as usize].record_time(start.elapsed());
        result
    }

    pub fn count(&self, opcode: Opcode) -> u64 {
        self.stats[u8::from(opcode) as usize].count
    }

    pub fn total_count(&self) -> u64 {
        self.stats.iter().map(|s| s.count).sum()
    }

    pub fn average(&self, opcode: Opcode) -> Duration {
        self.stats[u8::from(opcode) as usize].average()
    }

    /// Logs one line per opcode that was dispatched at least once.
    pub fn log_summary(&self) {
        for (index, stats) in self.stats.iter().enumerate() {
            if stats.count == 0 {
                continue;
            }
            let Ok(opcode) = Opcode::try_from(index as u8) else {
                continue;
            };
            info!(
                opcode = opcode.name(),
                count = stats.count,
                average = ?stats.average(),
                "dispatch stats"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_per_opcode() {
        let mut stats = DispatchStats::new();
        assert_eq!(stats.record(Opcode::Read, || 7), 7);
        stats.record(Opcode::Read, || ());
        stats.record(Opcode::Start, || ());

        assert_eq!(stats.count(Opcode::Read), 2);
        assert_eq!(stats.count(Opcode::Start), 1);
        assert_eq!(stats.count(Opcode::Write), 0);
        assert_eq!(stats.total_count(), 3);
        assert_eq!(stats.average(Opcode::Write), Duration::ZERO);
    }

    #[test]
    fn test_average_past_u32_counts() {
        let stats = OpcodeStats {
            elapsed: Duration::from_secs(1 << 32),
            count: 1 << 32,
        };
        assert_eq!(stats.average(), Duration::from_secs(1));

        let stats = OpcodeStats {
            elapsed: Duration::from_millis(30),
            count: 3,
        };
        assert_eq!(stats.average(), Duration::from_millis(10));
    }
}
