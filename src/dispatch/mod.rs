pub mod params;
pub mod router;

pub use router::{ActionRouter, RouteOutcome};
