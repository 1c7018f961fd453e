use super::*;
use crate::config::settings::OllamaConfig;

#[test]
fn unreachable_ollama_fails_connection_test() {
    let ollama = OllamaConfig {
        host: "127.0.0.1".to_string(),
        // Reserved port, nothing should be listening
        port: 1,
        ..OllamaConfig::default()
    };

    assert!(!test_ollama_connection(&ollama));
}
