pub mod input;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod sanitizer;
pub mod scoring;
pub mod store;
pub mod table;
