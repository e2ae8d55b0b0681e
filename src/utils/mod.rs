// Utility functions

pub mod logger;
pub mod single_flight;

pub use logger::*;
pub use single_flight::*;
