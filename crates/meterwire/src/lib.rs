//! Top-level facade crate for meterwire.
//!
//! Re-exports the core metric types and the server library so users can
//! depend on a single crate.

pub mod core {
    pub use meterwire_core::*;
}

pub mod server {
    pub use meterwire_server::*;
}
