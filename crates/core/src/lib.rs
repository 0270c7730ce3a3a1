//! Domain logic for the ltescope query backend.
//!
//! Pure, I/O-free building blocks shared by the API server: the dashboard
//! target-string grammar and the in-memory annotation event store.

pub mod annotation;
pub mod target;
