use std::sync::Mutex;

use futures::future::BoxFuture;

use super::*;

const AXES: [&str; 3] = ["ansiedad", "futuro", "redes"];

/// Embeds a text as keyword counts over [`AXES`] plus a constant bias.
struct KeywordEmbedder;

impl KeywordEmbedder {
    #[allow(clippy::cast_precision_loss)]
    fn vector(text: &str) -> Vec<f32> {
        let mut v: Vec<f32> = AXES
            .iter()
            .map(|axis| text.matches(axis).count() as f32)
            .collect();
        v.push(0.1);
        v
    }
}

impl Embedder for KeywordEmbedder {
    fn embed<'a>(
        &'a self,
        texts: &'a [&'a str],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>> {
        Box::pin(async move { Ok(texts.iter().map(|t| Self::vector(t)).collect()) })
    }
}

/// Records prompts and answers with a canned string; fails on a marker.
struct ScriptedGenerator {
    prompts: Mutex<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl ScriptedGenerator {
    fn new(fail_on: Option<&'static str>) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail_on,
        }
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, RagError>> {
        Box::pin(async move {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(marker) = self.fail_on {
                if prompt.contains(marker) {
                    return Err(RagError::Generator("scripted failure".to_string()));
                }
            }
            Ok("### 1. Pertinencia\n8/10".to_string())
        })
    }
}

fn settings() -> RagSettings {
    RagSettings {
        chunk_size: 400,
        top_k: 5,
        num_clusters: 5,
        cluster_seed: 42,
        max_visualized: 2000,
        map_path: None,
    }
}

fn corpus() -> Vec<String> {
    vec![
        "La ANSIEDAD me consume, ansiedad todo el día".to_string(),
        "Pienso en el futuro y siento miedo".to_string(),
        "Las redes sociales me agobian https://t.co/x".to_string(),
    ]
}

#[tokio::test]
async fn build_chunks_embeds_and_clusters() {
    let kb = KnowledgeBase::build(&corpus(), &KeywordEmbedder, &settings())
        .await
        .unwrap();
    assert_eq!(kb.len(), 3);
    assert!(kb.entries().iter().all(|e| e.cluster.is_some()));
    // 5 requested clusters clamp to 3 points
    assert_eq!(kb.cluster_sizes().len(), 3);
    assert_eq!(kb.glossary()[0], ("ansiedad".to_string(), 2));
    assert!(kb.entries()[2].chunk.text.contains("redes"));
    assert!(!kb.entries()[2].chunk.text.contains("http"));
}

#[tokio::test]
async fn retrieval_over_three_chunks_returns_three_results() {
    let kb = KnowledgeBase::build(&corpus(), &KeywordEmbedder, &settings())
        .await
        .unwrap();
    let retrieval = kb
        .retrieve(&KeywordEmbedder, "¿Qué pasa con el futuro?", 5)
        .await
        .unwrap();

    assert_eq!(retrieval.hits.len(), 3);
    assert_eq!(retrieval.records()[0], 1);
    assert!(retrieval.hits[0].1 <= retrieval.hits[1].1);
    assert_eq!(retrieval.context.matches("\n---\n").count(), 2);
}

#[tokio::test]
async fn empty_corpus_is_an_error() {
    let texts = vec!["123 !!!".to_string(), "de la que".to_string()];
    let err = KnowledgeBase::build(&texts, &KeywordEmbedder, &settings())
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::EmptyCorpus));
}

#[tokio::test]
async fn answers_every_question_in_order() {
    let kb = KnowledgeBase::build(&corpus(), &KeywordEmbedder, &settings())
        .await
        .unwrap();
    let generator = ScriptedGenerator::new(None);
    let questions = vec!["¿Ansiedad?".to_string(), "¿Redes?".to_string()];
    let mut report = ReportWriter::new(Vec::new(), "mem", "mistral").unwrap();

    let answered = answer_questions(&kb, &KeywordEmbedder, &generator, &questions, 5, &mut report)
        .await
        .unwrap();
    assert_eq!(answered, 2);

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].contains("[PREGUNTA A RESPONDER]\n¿Ansiedad?"));
    assert!(prompts[0].contains("Emoción detectada: ANSIEDAD_PRESION"));

    let text = String::from_utf8(report.into_inner()).unwrap();
    let first = text.find("## PREGUNTA 1: ¿Ansiedad?").unwrap();
    let second = text.find("## PREGUNTA 2: ¿Redes?").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn generation_failure_stops_the_run_and_keeps_written_sections() {
    let kb = KnowledgeBase::build(&corpus(), &KeywordEmbedder, &settings())
        .await
        .unwrap();
    let generator = ScriptedGenerator::new(Some("¿Segunda?"));
    let questions = vec![
        "¿Primera?".to_string(),
        "¿Segunda?".to_string(),
        "¿Tercera?".to_string(),
    ];
    let mut report = ReportWriter::new(Vec::new(), "mem", "mistral").unwrap();

    let err = answer_questions(&kb, &KeywordEmbedder, &generator, &questions, 5, &mut report)
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Generator(_)));
    assert_eq!(report.sections(), 1);
    assert_eq!(generator.prompts.lock().unwrap().len(), 2);

    let text = String::from_utf8(report.into_inner()).unwrap();
    assert!(text.contains("## PREGUNTA 1: ¿Primera?"));
    assert!(!text.contains("PREGUNTA 2"));
}

#[tokio::test]
async fn map_is_written_when_configured() {
    let path = std::env::temp_dir().join(format!("sentido-kb-map-{}.svg", std::process::id()));
    let mut with_map = settings();
    with_map.map_path = Some(path.clone());

    KnowledgeBase::build(&corpus(), &KeywordEmbedder, &with_map)
        .await
        .unwrap();
    let svg = std::fs::read_to_string(&path).unwrap();
    assert_eq!(svg.matches("r=\"3\"").count(), 3);
    std::fs::remove_file(&path).ok();
}
