//! CLI command implementations.

mod documents;
mod extract;
mod merge;
mod show;

pub use documents::execute_documents;
pub use extract::execute_extract;
pub use merge::execute_merge;
pub use show::execute_show;
