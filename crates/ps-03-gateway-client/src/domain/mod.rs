//! # Domain Module
//!
//! Gateway request and response shapes, faults and errors.

pub mod entities;
pub mod errors;
pub mod invariants;

pub use entities::*;
pub use errors::*;
pub use invariants::*;
