pub mod gemini_service;
pub mod llm_interpreter;
