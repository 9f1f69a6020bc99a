//! FitPulse backend library
//!
//! Exposes the backend modules for the binary and the integration tests.

pub mod ai;
pub mod auth;
pub mod config;
pub mod error;
pub mod roster;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;
