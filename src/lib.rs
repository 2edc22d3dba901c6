pub mod batch;
pub mod config;
pub mod error;
pub mod generate;
pub mod llm;
pub mod log;
pub mod normalize;
pub mod prompts;
pub mod reel;
pub mod render;

pub use error::{Error, Result};
