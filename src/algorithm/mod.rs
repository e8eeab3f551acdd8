pub mod clock;
pub mod rate;
pub mod throttle;

pub use rate::{parse_bytes, Rate};
pub use throttle::{Throttle, BUFFER_SIZE, MIN_SLEEP_MS};
