pub mod document_service;
pub mod fallback_generator;
pub mod llm_service;
pub mod quiz_service;
