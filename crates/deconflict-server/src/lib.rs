//! Shared library surface for the deconfliction server and its tests.

pub mod api;
pub mod config;
pub mod state;
