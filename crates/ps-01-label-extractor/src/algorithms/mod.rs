//! # Algorithms
//!
//! Directive parsing and extraction over [`ContainerInfo`](crate::ContainerInfo).

pub mod extract;

pub use extract::{extract, parse_directive, LabelExtractor};
