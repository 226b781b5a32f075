pub mod context;
pub mod generator;
pub mod session;
pub mod templates;

pub use crate::domain::model::{ExcuseRequest, HistoryEntry};
pub use crate::domain::ports::{Clock, HistoryStore};
pub use crate::utils::error::Result;
