//! LingerGuard daemon library: process collection, lifetime evaluation,
//! termination and reporting.

pub mod collector;
pub mod config;
pub mod detector;
pub mod executor;
pub mod monitor;
pub mod reporter;
