pub mod duration;
pub mod time;
pub use duration::format_duration;
pub use time::{elapsed_since, now};
