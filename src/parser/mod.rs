mod json;
mod snapshot;
mod validation;

pub use json::*;
pub use snapshot::*;
pub use validation::*;
