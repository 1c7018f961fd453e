//! PDF question answering: load a document, chunk and embed it, then answer
//! questions from the most similar chunks.

pub mod chunking;
pub mod index;
pub mod pdf;


use std::path::Path;

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::config::{Config, Secrets};
use crate::docqa::chunking::{ChunkingConfig, DocumentChunk, chunk_pages};
use crate::docqa::index::ChunkIndex;
use crate::docqa::pdf::{DocumentPage, extract_pages};
use crate::embeddings::OllamaClient;
use crate::llm::{GroqClient, prompts};
use crate::{BrieflyError, Result as BrieflyResult};

const TOP_K: usize = 5;
const ANSWER_MAX_TOKENS: u32 = 1024;
const EMBED_PROGRESS_BATCH: usize = 16;

pub const NO_DOCUMENT_MESSAGE: &str =
    "No document has been loaded yet. Load a PDF before asking questions.";
pub const INVALID_QUESTION_MESSAGE: &str = "Please provide a valid question.";

/// Summary of the processed document, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStats {
    pub source: String,
    pub pages: usize,
    pub total_chunks: usize,
    pub embedding_dimension: usize,
    pub model_name: String,
}

struct IndexedDocument {
    source: String,
    pages: usize,
    chunks: Vec<DocumentChunk>,
    index: ChunkIndex,
}

/// Retrieval-augmented question answering over a single PDF.
pub struct DocumentQa {
    groq: GroqClient,
    ollama: OllamaClient,
    chunking: ChunkingConfig,
    document: Option<IndexedDocument>,
}

impl DocumentQa {
    #[inline]
    pub fn new(config: &Config, secrets: &Secrets) -> BrieflyResult<Self> {
        let groq = GroqClient::new(&config.groq, secrets.groq_api_key.clone())
            .map_err(|e| BrieflyError::Llm(e.to_string()))?;
        let ollama = OllamaClient::new(&config.ollama)
            .map_err(|e| BrieflyError::Embedding(e.to_string()))?;

        Ok(Self {
            groq,
            ollama,
            chunking: config.chunking.clone(),
            document: None,
        })
    }

    /// Extract, chunk, embed, and index a PDF file.
    #[inline]
    pub fn process(
        &mut self,
        path: &Path,
        progress: Option<&ProgressBar>,
    ) -> BrieflyResult<DocumentStats> {
        let pages =
            extract_pages(path).map_err(|e| BrieflyError::Document(e.to_string()))?;
        self.index_pages(pages, progress)
    }

    /// Chunk, embed, and index already-extracted pages.
    #[inline]
    pub fn index_pages(
        &mut self,
        pages: Vec<DocumentPage>,
        progress: Option<&ProgressBar>,
    ) -> BrieflyResult<DocumentStats> {
        let source = pages
            .first()
            .map(|page| page.source.clone())
            .ok_or_else(|| {
                BrieflyError::Document("Document contained no extractable text".to_string())
            })?;

        let chunks = chunk_pages(&pages, &self.chunking);
        if chunks.is_empty() {
            return Err(BrieflyError::Document(format!(
                "No chunks could be produced from {source}"
            )));
        }

        info!("Embedding {} chunks from {}", chunks.len(), source);
        if let Some(bar) = progress {
            bar.set_length(chunks.len() as u64);
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(EMBED_PROGRESS_BATCH) {
            let texts: Vec<String> = batch.iter().map(|chunk| chunk.text.clone()).collect();
            let embeddings = self
                .ollama
                .embed_batch(&texts)
                .map_err(|e| BrieflyError::Embedding(e.to_string()))?;

            for (chunk, embedding) in batch.iter().zip(embeddings) {
                entries.push((chunk.id, embedding));
            }
            if let Some(bar) = progress {
                bar.inc(batch.len() as u64);
            }
        }

        let index =
            ChunkIndex::build(entries).map_err(|e| BrieflyError::Embedding(e.to_string()))?;

        let stats = DocumentStats {
            source: source.clone(),
            pages: pages.len(),
            total_chunks: chunks.len(),
            embedding_dimension: index.dimension(),
            model_name: self.groq.model().to_string(),
        };

        self.document = Some(IndexedDocument {
            source,
            pages: pages.len(),
            chunks,
            index,
        });

        Ok(stats)
    }

    /// Answer a question from the loaded document.
    ///
    /// Never fails the conversation: validation problems and downstream
    /// errors all come back as user-facing strings.
    #[inline]
    pub fn answer(&self, question: &str) -> String {
        let question = question.trim();
        if question.is_empty() {
            return INVALID_QUESTION_MESSAGE.to_string();
        }

        let Some(document) = &self.document else {
            return NO_DOCUMENT_MESSAGE.to_string();
        };

        match self.answer_from_document(document, question) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Error answering question: {}", e);
                format!("I apologize, but I encountered an error: {e}")
            }
        }
    }

    fn answer_from_document(&self, document: &IndexedDocument, question: &str) -> Result<String> {
        let query_embedding = self
            .ollama
            .embed(question)
            .context("Failed to embed question")?;

        let matches = document
            .index
            .search(&query_embedding, TOP_K)
            .context("Similarity search failed")?;

        debug!("Retrieved {} chunks for question", matches.len());

        let context = format_context(&document.chunks, &matches);
        self.groq
            .complete(
                prompts::DOCUMENT_QA_SYSTEM,
                &prompts::document_qa_user(&context, question),
                ANSWER_MAX_TOKENS,
            )
            .context("Completion failed")
    }

    /// Stats for the loaded document, if any.
    #[inline]
    pub fn stats(&self) -> Option<DocumentStats> {
        self.document.as_ref().map(|document| DocumentStats {
            source: document.source.clone(),
            pages: document.pages,
            total_chunks: document.chunks.len(),
            embedding_dimension: document.index.dimension(),
            model_name: self.groq.model().to_string(),
        })
    }

    /// Drop the loaded document and its index.
    #[inline]
    pub fn clear(&mut self) {
        self.document = None;
    }
}

/// Render retrieved chunks as numbered excerpts with page citations.
fn format_context(chunks: &[DocumentChunk], matches: &[index::ScoredChunk]) -> String {
    if matches.is_empty() {
        return "No relevant information found in the document.".to_string();
    }

    let excerpts: Vec<String> = matches
        .iter()
        .enumerate()
        .filter_map(|(i, scored)| {
            chunks.iter().find(|chunk| chunk.id == scored.chunk_id).map(|chunk| {
                format!(
                    "Excerpt {} (Page {}):\n{}",
                    i + 1,
                    chunk.page_number,
                    chunk.text
                )
            })
        })
        .collect();

    excerpts.join("\n\n")
}
