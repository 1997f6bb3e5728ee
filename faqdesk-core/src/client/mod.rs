pub mod openai;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use openai::OpenAIClient;
pub use traits::*;
pub use types::*;
