pub mod app;
pub mod config;
pub mod device;
pub mod model;
pub mod play;
pub mod traits;
pub mod util;
