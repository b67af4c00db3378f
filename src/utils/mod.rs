// Utility module for common functionality
// Author: Gabriel Demetrios Lafis

mod logging;

pub use logging::*;
