//! Step definitions and scenario world.

pub mod world;
mod when;
mod then;
