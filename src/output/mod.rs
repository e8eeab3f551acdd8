pub mod progress;
pub mod stats;

pub use progress::ProgressDisplay;
pub use stats::TransferStats;
