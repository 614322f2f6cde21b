// Library root. Exposes the sync modules to the integration tests in `tests/`.
// Production entry point remains `src/main.rs`.

pub mod classifier;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod records;
pub mod services;
pub mod summary;
pub mod sync;

// Startup plumbing used by the binary.
pub mod cli;
pub mod config;
pub mod logging;
