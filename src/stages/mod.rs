pub mod edit;
pub mod humanize;
pub mod research;
pub mod write;

pub use edit::{EditOutcome, execute_edit};
pub use humanize::execute_humanize;
pub use research::execute_research;
pub use write::execute_write;
