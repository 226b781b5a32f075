// Adapters layer: concrete implementations of the domain ports.

pub mod clock;
pub mod history_store;

pub use clock::{FixedClock, SystemClock};
pub use history_store::{JsonlHistoryStore, DEFAULT_HISTORY_DIR};
