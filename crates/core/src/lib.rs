//! Hand scoring engine. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod effects;
pub mod error;
pub mod hand;
pub mod jokers;
pub mod modifiers;
pub mod pipeline;
pub mod probability;
pub mod rng;
pub mod rules;
pub mod scoring;

pub use cards::*;
pub use config::*;
pub use effects::*;
pub use error::*;
pub use hand::*;
pub use modifiers::*;
pub use pipeline::*;
pub use probability::*;
pub use rng::*;
pub use rules::*;
pub use scoring::*;
