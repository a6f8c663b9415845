pub mod cache;
pub mod loader;
pub mod media;
pub mod priority;
pub mod queue;
