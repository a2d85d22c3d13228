//! Goalkeeper server library entry.
//!
//! This crate wires config, the goal store adapters, the HTTP surface, and
//! observability into one service. It is consumed by the binary (`main.rs`)
//! and by integration tests.

pub mod api;
pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod store;
