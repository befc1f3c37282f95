mod error;
mod file;
mod flags;
mod fs;
mod stat;

pub use error::*;
pub use file::*;
pub use flags::*;
pub use fs::*;
pub use stat::*;
