pub mod catalog;
pub mod error;
pub mod io;
pub mod paths;
pub mod phase;
pub mod project;
pub mod state;
pub mod tool;
pub mod tool_data;
pub mod types;

pub use error::{DmaicError, Result};
