pub mod badge;
pub mod cli;
pub mod document;
pub mod error;
pub mod loader;
pub mod normalize;
pub mod summary;
