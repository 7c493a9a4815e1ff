pub mod cli;
pub mod completion;
pub mod config;
pub mod global;
pub mod minutes;
pub mod vtt;
