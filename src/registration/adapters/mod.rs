//! Adapter implementations for guild registration ports.

pub mod memory;
pub mod postgres;
