pub mod arithmetic;
pub mod metrics;
pub mod providers;

pub use providers::{TextProvider, UNKNOWN_ANSWER};
