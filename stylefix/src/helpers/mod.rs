//! Helper modules for stylefix command implementations

pub mod global_args;
pub mod output;

pub use global_args::GlobalArgs;
pub use output::{OutputFormat, OutputManager};
