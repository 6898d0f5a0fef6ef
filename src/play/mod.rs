// Timed dispatch of a schedule to the device channel.

pub mod dispatcher;
pub mod progress;
pub mod waiter;

pub use dispatcher::Dispatcher;
pub use progress::Progress;
pub use waiter::HybridWaiter;
