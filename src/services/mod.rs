pub mod clipboard;
pub mod generation;
pub mod key_storage;
pub mod pipeline;
pub mod prompt;
