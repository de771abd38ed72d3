pub mod memory;
pub mod summary;
pub mod title;

pub use memory::{explain_memory, NO_MEMORY_EXPLANATION};
pub use summary::{generate_summary, summary_due, summary_prompt};
pub use title::{auto_title, candidate_title, MAX_TITLE_CHARS};
