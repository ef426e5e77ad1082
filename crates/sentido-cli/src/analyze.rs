//! `sentido analyze`: build the knowledge base and answer the research
//! questions into the Markdown report.

use std::path::Path;

use anyhow::Context;
use sentido_core::{load_questions, read_text_column, PipelineConfig};
use sentido_rag::{
    answer_questions, KnowledgeBase, OllamaGenerator, RagSettings, ReportWriter, TeiClient,
};

/// Characters of each question shown in progress lines.
const QUESTION_PREVIEW_CHARS: usize = 40;

fn preview(question: &str) -> String {
    question.chars().take(QUESTION_PREVIEW_CHARS).collect()
}

/// Run the analysis stage.
///
/// With `dry_run`, retrieval is shown per question and neither the generator
/// nor the report is touched.
///
/// # Errors
///
/// Returns an error if the corpus or questions cannot be loaded, the
/// knowledge base cannot be built, or any question fails. Report sections
/// written before a failure remain on disk.
pub(crate) async fn run_analyze(
    config: &PipelineConfig,
    input: Option<&Path>,
    report_path: Option<&Path>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let input = input.unwrap_or(&config.clean_corpus_path);
    let report_path = report_path.unwrap_or(&config.report_path);

    let texts = read_text_column(input)?;
    let questions = load_questions(&config.questions_path)
        .with_context(|| format!("loading {}", config.questions_path.display()))?
        .questions;
    println!("loaded {} comments from {}", texts.len(), input.display());

    let embedder = TeiClient::new(&config.tei_url);
    let settings = RagSettings::from(config);
    tracing::info!(
        model = config.embed_model.as_str(),
        tei_url = config.tei_url.as_str(),
        "embedding corpus"
    );
    let kb = KnowledgeBase::build(&texts, &embedder, &settings).await?;

    println!("glossary:");
    for (term, count) in kb.glossary() {
        println!("  - {term}: {count}");
    }
    println!(
        "indexed {} chunks; cluster sizes {:?}; map written to {}",
        kb.len(),
        kb.cluster_sizes(),
        config.map_path.display()
    );

    if dry_run {
        for (i, question) in questions.iter().enumerate() {
            let retrieval = kb.retrieve(&embedder, question, settings.top_k).await?;
            println!(
                "dry-run {}/{}: {}... -> records {:?}, emotion {}",
                i + 1,
                questions.len(),
                preview(question),
                retrieval.records(),
                retrieval.emotion.dominant.to_uppercase()
            );
        }
        return Ok(());
    }

    let generator = OllamaGenerator::new(&config.generation_command, &config.generation_model);
    let mut report = ReportWriter::create(report_path, generator.model())?;
    println!(
        "answering {} questions with {} (report: {})",
        questions.len(),
        generator.model(),
        report_path.display()
    );

    let answered = answer_questions(
        &kb,
        &embedder,
        &generator,
        &questions,
        settings.top_k,
        &mut report,
    )
    .await
    .with_context(|| {
        format!(
            "analysis stopped; completed sections remain in {}",
            report_path.display()
        )
    })?;

    println!("done: {answered} questions answered, report at {}", report_path.display());
    Ok(())
}
