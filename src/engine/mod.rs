pub mod core;
pub mod messages;
pub mod state;
pub mod worker;

// Re-export key components
pub use core::ScanEngine;
pub use state::PairState;
