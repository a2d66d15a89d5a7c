//! Domain types.
//!
//! Core value types shared by the store, resolver and pipeline.

mod env;
mod parameter;
mod stage;

pub use env::Env;
pub use parameter::{Parameter, Source};
pub use stage::{Stage, Step, Verification};
