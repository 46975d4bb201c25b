pub mod catalog;
pub mod matcher;

pub use catalog::{ActionId, PhraseCatalog};
pub use matcher::IntentMatcher;
