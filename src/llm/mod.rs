pub mod gemini_llm;
pub mod llm_interface;

#[cfg(test)]
pub mod stub_llm;

pub use gemini_llm::GeminiLLM;
pub use llm_interface::*;
