//! Watch Use Case
//!
//! Continuous rebuilding with live reload. It orchestrates:
//! - File system monitoring (via `notify` crate) through a bounded queue
//! - Debouncing (100ms default) and a content filter for no-op saves
//! - Incremental rebuilds of only the changed modules
//! - Reload notices for browsers after each successful rebuild
//!
//! ## Architecture
//!
//! - `WatchUseCase` - notify plumbing and the event loop
//! - `WatchController` - the Idle/Building/Watching state machine around the pipeline
//! - `Debouncer` / `ContentFilter` - turn raw events into change batches
//! - `WatchEvent` - Events emitted during watch operation

mod cache;
mod controller;
mod event;
mod state;
mod use_case;


pub use cache::ContentFilter;
pub use controller::WatchController;
pub use event::{ChangeBatch, Debouncer, WatchEvent, DEBOUNCE_MS};
pub use state::{Phase, Trigger};
pub use use_case::WatchUseCase;
