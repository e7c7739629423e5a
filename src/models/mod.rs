pub mod article;
pub mod research;
pub mod state;

pub use article::*;
pub use research::*;
pub use state::*;
