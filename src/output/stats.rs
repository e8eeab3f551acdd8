use std::time::Duration;

use crate::algorithm::Rate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub bytes_copied: u64,
    pub chunks: u64,
    pub sleeps: u64,
    /// 実際に眠っていた時間（計測値）
    pub slept: Duration,
    pub elapsed: Duration,
    /// 最後の残差 (ms)
    pub drift_ms: i64,
}

impl TransferStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn throughput(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.bytes_copied as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// サマリーを stderr に出力（stdout はデータ専用）
    pub fn print(&self, rate: Rate) {
        eprintln!("Target rate: {}", rate);
        eprintln!("Bytes copied: {}", self.bytes_copied);
        eprintln!("Chunks: {}", self.chunks);
        eprintln!("Sleeps: {} ({:?})", self.sleeps, self.slept);
        eprintln!("Elapsed: {:?}", self.elapsed);
        eprintln!("Average rate: {:.2} B/s", self.throughput());
        eprintln!("Residual drift: {} ms", self.drift_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput() {
        let stats = TransferStats {
            bytes_copied: 4096,
            elapsed: Duration::from_secs(4),
            ..TransferStats::new()
        };
        assert_eq!(stats.throughput(), 1024.0);
    }

    #[test]
    fn test_throughput_without_elapsed_time() {
        let stats = TransferStats {
            bytes_copied: 4096,
            ..TransferStats::new()
        };
        assert_eq!(stats.throughput(), 0.0);
    }
}
