// Seams between the playback core and its environment.

pub mod sink;
pub mod time;

pub use sink::TapSink;
pub use time::{MockTimeProvider, SystemTimeProvider, TimeProvider};
