//! Loading and validation of balance tables and scoring scenarios.

pub mod load;
pub mod scenario;
pub mod schema;

pub use load::*;
pub use scenario::*;
pub use schema::*;
