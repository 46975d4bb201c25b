pub mod assistant;
pub mod config;
pub mod dialog;
pub mod dispatch;
pub mod intent;
pub mod logbook;
pub mod services;

pub use assistant::CommandLoop;
pub use intent::{ActionId, IntentMatcher, PhraseCatalog};
