//! Everything written to stderr for people: banner, stage progress, summary
//! tables and error boxes. Machine-readable results go to stdout instead.

mod banner;
mod error;
mod progress;
mod tables;

pub use banner::{banner_for_help, print_banner};
pub use error::print_error;
pub use progress::Progress;
pub use tables::{print_classification, print_depth_report, print_input_summary, print_nv_summary};

/// Whether the human-facing output is shown.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    /// Interactive when stderr is a terminal and `--quiet` was not given.
    pub fn for_run(quiet: bool) -> Self {
        Self {
            interactive: !quiet && crate::io::stderr_is_tty(),
        }
    }
}
