pub mod error;
pub mod file;

pub use error::PlayError;
