// Provider implementations
pub mod anthropic;
pub mod openai;

// Provider registry
pub mod registry;

// Extraction dispatch
mod extract;

pub use extract::extract_details;
pub use registry::{Provider, ProviderRegistry, TARGET_HEADER};
