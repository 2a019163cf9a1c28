//! Collaborator layer for the scripture retrieval core.
//!
//! Loads every book at startup, applies the caller's web search policy and
//! turns retrieved passages and web results into prompt sections. It never
//! calls a text-generation API itself.

mod augmentation;
mod book;
mod handler;
mod mode;

pub use augmentation::{Augmentation, CurrentEventsSection};
pub use book::{Book, UnknownBook};
pub use handler::{AugmentationHandler, BookHealth, HealthReport};
pub use mode::SearchMode;
