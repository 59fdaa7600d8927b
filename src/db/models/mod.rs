mod certification;
mod program;

pub use certification::*;
pub use program::*;
