//! Top-level facade crate for goalkeeper.
//!
//! Re-exports the domain model and the server library so users can depend on a single crate.

pub mod core {
    pub use goalkeeper_core::*;
}

pub mod server {
    pub use goalkeeper_server::*;
}
