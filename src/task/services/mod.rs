//! Application services for task storage.

mod store;

pub use store::TaskStore;
