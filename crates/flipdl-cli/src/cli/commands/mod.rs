//! CLI command handlers, one file per command.

mod completions;
mod fetch;
mod info;
mod progress;

pub use completions::{run_completions, run_man};
pub use fetch::{run_fetch, FetchOptions};
pub use info::run_info;
