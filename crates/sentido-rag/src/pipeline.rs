//! RAG analysis orchestration.
//!
//! [`KnowledgeBase::build`] runs once per invocation: normalize, glossary,
//! chunk, embed, cluster, map, index. [`answer_questions`] then handles the
//! research questions one at a time, appending each answer to the report
//! before moving on.

use std::io::Write;
use std::path::PathBuf;

use sentido_core::PipelineConfig;

use crate::chunking::{chunk_texts, Chunk};
use crate::cluster::kmeans;
use crate::corpus::{assign_clusters, EmbeddedChunk};
use crate::embeddings::Embedder;
use crate::emotion::{detect_emotion, EmotionReading};
use crate::error::RagError;
use crate::generator::TextGenerator;
use crate::glossary::log_glossary;
use crate::index::FlatL2Index;
use crate::normalize::normalize;
use crate::projection::write_semantic_map;
use crate::prompt::{build_prompt, join_context};
use crate::report::ReportWriter;

/// Tunables for building and querying the knowledge base.
#[derive(Debug, Clone)]
pub struct RagSettings {
    pub chunk_size: usize,
    pub top_k: usize,
    pub num_clusters: usize,
    pub cluster_seed: u64,
    pub max_visualized: usize,
    /// Where the semantic map is written; `None` skips it.
    pub map_path: Option<PathBuf>,
}

impl From<&PipelineConfig> for RagSettings {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            chunk_size: config.chunk_size,
            top_k: config.top_k,
            num_clusters: config.num_clusters,
            cluster_seed: config.cluster_seed,
            max_visualized: config.max_visualized,
            map_path: Some(config.map_path.clone()),
        }
    }
}

/// Chunks retrieved for one question, with the tone read from them.
#[derive(Debug, Clone)]
pub struct Retrieval<'a> {
    /// Closest first, paired with squared L2 distance.
    pub hits: Vec<(&'a EmbeddedChunk, f32)>,
    pub context: String,
    pub emotion: EmotionReading,
}

impl Retrieval<'_> {
    /// Source comment positions of the retrieved chunks, in rank order.
    #[must_use]
    pub fn records(&self) -> Vec<usize> {
        self.hits.iter().map(|(e, _)| e.chunk.record).collect()
    }
}

/// Embedded, clustered and indexed corpus.
#[derive(Debug)]
pub struct KnowledgeBase {
    entries: Vec<EmbeddedChunk>,
    index: FlatL2Index,
    glossary: Vec<(String, usize)>,
    cluster_sizes: Vec<usize>,
}

impl KnowledgeBase {
    /// Build the knowledge base from raw comment texts.
    ///
    /// # Errors
    ///
    /// - [`RagError::EmptyCorpus`] when normalization leaves nothing to chunk.
    /// - Any embedding failure, misalignment or map write error.
    pub async fn build<E>(
        texts: &[String],
        embedder: &E,
        settings: &RagSettings,
    ) -> Result<Self, RagError>
    where
        E: Embedder + ?Sized,
    {
        let normalized: Vec<String> = texts.iter().map(|t| normalize(t)).collect();
        let glossary = log_glossary(&normalized);

        let chunks: Vec<Chunk> = chunk_texts(&normalized, settings.chunk_size);
        tracing::info!(
            records = texts.len(),
            chunks = chunks.len(),
            "chunked corpus"
        );
        if chunks.is_empty() {
            return Err(RagError::EmptyCorpus);
        }

        let chunk_refs: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = embedder.embed(&chunk_refs).await?;
        let mut entries = EmbeddedChunk::pair(chunks, embeddings)?;

        let vectors: Vec<Vec<f32>> = entries.iter().map(|e| e.embedding.clone()).collect();
        let clustering = kmeans(&vectors, settings.num_clusters, settings.cluster_seed);
        assign_clusters(&mut entries, &clustering.labels)?;
        let cluster_sizes = clustering.sizes();
        tracing::info!(
            clusters = cluster_sizes.len(),
            inertia = clustering.inertia,
            sizes = ?cluster_sizes,
            "clustered chunks"
        );

        if let Some(path) = &settings.map_path {
            write_semantic_map(path, &vectors, &clustering.labels, settings.max_visualized)?;
        }

        let index = FlatL2Index::from_vectors(entries.iter().map(|e| e.embedding.as_slice()))?;
        tracing::info!(vectors = index.len(), dim = index.dim(), "built index");

        Ok(Self {
            entries,
            index,
            glossary,
            cluster_sizes,
        })
    }

    #[must_use]
    pub fn entries(&self) -> &[EmbeddedChunk] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top glossary terms of the normalized corpus.
    #[must_use]
    pub fn glossary(&self) -> &[(String, usize)] {
        &self.glossary
    }

    #[must_use]
    pub fn cluster_sizes(&self) -> &[usize] {
        &self.cluster_sizes
    }

    /// Embed `question` and fetch its `top_k` nearest chunks.
    ///
    /// # Errors
    ///
    /// Returns any embedding failure, or [`RagError::Dimension`] when the
    /// question vector does not match the index.
    pub async fn retrieve<E>(
        &self,
        embedder: &E,
        question: &str,
        top_k: usize,
    ) -> Result<Retrieval<'_>, RagError>
    where
        E: Embedder + ?Sized,
    {
        let query = embedder
            .embed(&[question])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Tei("no embedding returned for question".to_string()))?;

        let hits: Vec<(&EmbeddedChunk, f32)> = self
            .index
            .search(&query, top_k)?
            .into_iter()
            .map(|hit| (&self.entries[hit.position], hit.distance))
            .collect();

        let texts: Vec<&str> = hits.iter().map(|(e, _)| e.chunk.text.as_str()).collect();
        let context = join_context(&texts);
        let emotion = detect_emotion(&texts);

        Ok(Retrieval {
            hits,
            context,
            emotion,
        })
    }
}

/// Answer every question in order, appending one report section each.
///
/// Stops at the first failure; sections already written stay on disk.
///
/// # Errors
///
/// Returns the first retrieval, generation or report error.
pub async fn answer_questions<E, G, W>(
    kb: &KnowledgeBase,
    embedder: &E,
    generator: &G,
    questions: &[String],
    top_k: usize,
    report: &mut ReportWriter<W>,
) -> Result<usize, RagError>
where
    E: Embedder + ?Sized,
    G: TextGenerator + ?Sized,
    W: Write,
{
    let total = questions.len();
    for (i, question) in questions.iter().enumerate() {
        let number = i + 1;
        tracing::info!(number, total, question = question.as_str(), "processing question");

        let retrieval = kb.retrieve(embedder, question, top_k).await?;
        tracing::debug!(
            number,
            records = ?retrieval.records(),
            emotion = retrieval.emotion.dominant,
            "retrieved context"
        );

        let prompt = build_prompt(&retrieval.context, question, &retrieval.emotion);
        let answer = generator.generate(&prompt).await?;
        report.append_section(number, question, retrieval.emotion.dominant, &answer)?;
    }
    Ok(report.sections())
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
