mod cli;
mod command;
mod config;
mod log;

pub use cli::*;
pub use command::run;
pub use config::*;
pub use log::*;
