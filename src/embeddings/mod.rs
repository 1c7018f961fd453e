// Embedding generation for document chunks

pub mod ollama;

pub use ollama::OllamaClient;
