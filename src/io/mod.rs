pub mod context;
pub mod output;

pub use context::{load_context_file, parse_context_json};
pub use output::{generate_filename, render_markdown, write_article};
