pub mod init;
pub mod metric;
pub mod phase;
pub mod project;
pub mod state;
pub mod tool;
