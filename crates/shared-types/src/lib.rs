//! # Shared Types Crate
//!
//! The canonical port-mapping record and its validation rules, shared by
//! every Portside subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: every producer (config entries, label
//!   directives, published container ports, one-shot command arguments)
//!   yields a [`PortMapping`].
//! - **Validated at the Boundary**: a `PortMapping` is checked when it is
//!   created and never mutated afterwards.
//! - **No Retained State**: mappings are built, handed to the gateway client
//!   and dropped. The gateway device is the only durable state.
//!
//! ## Grammar
//!
//! ```text
//! [<external>][:<internal>][/<protocol>]
//!
//! 8080:80/tcp  ->  8080 -> 80   TCP
//! 80           ->    80 -> 80   TCP
//! :80/udp      ->    80 -> 80   UDP
//! 8080:        ->  8080 -> 8080 TCP
//! ```

pub mod entities;
pub mod errors;
pub mod parser;

pub use entities::*;
pub use errors::*;
pub use parser::parse_port_mapping;
