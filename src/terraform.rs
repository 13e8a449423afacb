//! Flat resource state and the schemas that describe it.

mod schema;
mod state;

pub use schema::{Attribute, AttributeType, DiffSuppressFunc, Schema, StateFunc, location};
pub use state::ResourceData;
