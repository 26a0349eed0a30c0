//! Application layer: repo resolution, iteration and the coho commands.

pub mod services;
pub mod use_cases;
