pub mod commands;
pub mod output;
pub mod render;
pub mod repl;

pub use commands::Command;
pub use render::MarkdownStream;
pub use repl::Repl;
