//! Background tasks module
//! 
//! This module contains the tick source and the terminal console that run
//! alongside the HTTP server.

pub mod console;
pub mod ticker;

// Re-export main functions
pub use console::console_task;
pub use ticker::spawn_ticker;
