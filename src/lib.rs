// Library module for mirra
// Re-exports modules for use in integration tests and the binary

pub mod journal;
pub mod scheduler;
pub mod sync;
