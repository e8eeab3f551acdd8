use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::time::Duration;

use crate::output::TransferStats;

/// プログレス表示（stderr）
pub struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// 入力サイズは分からないのでスピナー表示
    pub fn new() -> Self {
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec}) {msg}")
                .expect("Invalid progress bar template"),
        );
        bar.enable_steady_tick(Duration::from_millis(200));

        Self { bar }
    }

    /// 進捗を更新
    pub fn update(&self, stats: &TransferStats) {
        self.bar.set_position(stats.bytes_copied);
        self.bar.set_message(format!("{} chunks, {} sleeps", stats.chunks, stats.sleeps));
    }

    /// 転送完了
    pub fn finish(&self) {
        self.bar.finish_with_message("Transfer complete");
    }

    /// プログレスバーを非表示にする（テスト用）
    #[cfg(test)]
    pub fn hide(&self) {
        self.bar.set_draw_target(ProgressDrawTarget::hidden());
    }
}

impl Default for ProgressDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProgressDisplay {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_tracks_bytes() {
        let progress = ProgressDisplay::new();
        progress.hide();

        let stats = TransferStats {
            bytes_copied: 16384,
            chunks: 1,
            ..TransferStats::new()
        };
        progress.update(&stats);
        assert_eq!(progress.bar.position(), 16384);

        progress.finish();
        assert!(progress.bar.is_finished());
    }

    #[test]
    fn test_default_starts_at_zero() {
        let progress = ProgressDisplay::default();
        progress.hide();
        assert_eq!(progress.bar.position(), 0);
    }
}
