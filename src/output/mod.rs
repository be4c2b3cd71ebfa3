mod exports;
mod progress;
mod styling;
mod summary;
mod tables;

pub use exports::export_outcome;
pub use progress::RequestProgress;
use styling::{dim, title};

/// Prints the `glpipeline` banner to stderr.
pub fn print_banner() {
    eprintln!(
        r"
{} {}
  {}
",
        title("🚀 glpipeline"),
        dim(env!("CARGO_PKG_VERSION")),
        dim("GitLab pipeline trigger")
    );
}
