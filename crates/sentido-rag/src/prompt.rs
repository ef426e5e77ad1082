//! Prompt sent to the text generator for each research question.

use crate::emotion::EmotionReading;

/// Separator placed between retrieved chunks in the context block.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// Join retrieved chunk texts into one context block.
#[must_use]
pub fn join_context<S: AsRef<str>>(chunks: &[S]) -> String {
    chunks
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

/// Build the analysis prompt: analyst persona, relevance self-assessment,
/// detected emotion, retrieved context, the question, and the expected
/// Markdown layout of the answer.
#[must_use]
pub fn build_prompt(context: &str, question: &str, emotion: &EmotionReading) -> String {
    let emotion_label = emotion.dominant.to_uppercase();
    let breakdown = emotion.breakdown();
    format!(
        "[ROL]
Eres un analista filosófico crítico. Utilizas marcos teóricos de:
- Byung-Chul Han (cansancio, autoexplotación).
- Zygmunt Bauman (modernidad líquida).
- Michel Foucault (vigilancia, biopolítica).
- Jean-François Lyotard (fin de los metarrelatos).
- Martin Heidegger (la técnica como desocultamiento, autenticidad).
- Jürgen Habermas (esfera pública, acción comunicativa).

[EVALUACIÓN PREVIA]
Evalúa del 1 al 10 qué tan relevante es el contexto recuperado para responder.

[DATOS DEL SISTEMA]
Emoción detectada: {emotion_label} ({breakdown})

[CONTEXTO RECUPERADO]
{context}

[PREGUNTA A RESPONDER]
{question}

[FORMATO DE SALIDA]
Responde en formato Markdown limpio:
### 1. Pertinencia del Contexto (Nota /10)
[Breve justificación]

### 2. Análisis Filosófico
[Desarrolla tu respuesta aquí citando a los autores pertinentes según la pregunta.
Ejemplo: si la pregunta es sobre \"esfera pública\", cita a Habermas. Si es sobre \"ser\", a Heidegger.]
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::detect_emotion;

    #[test]
    fn context_chunks_are_separated() {
        assert_eq!(join_context(&["uno", "dos"]), "uno\n---\ndos");
        assert_eq!(join_context::<&str>(&[]), "");
    }

    #[test]
    fn prompt_carries_emotion_context_and_question() {
        let emotion = detect_emotion(&["miedo miedo rabia"]);
        let prompt = build_prompt("contexto de prueba", "¿Qué sienten?", &emotion);

        assert!(prompt.starts_with("[ROL]"));
        assert!(prompt.contains("Emoción detectada: ANSIEDAD_PRESION (ansiedad_presion: 2, frustracion_impotencia: 1)"));
        assert!(prompt.contains("[CONTEXTO RECUPERADO]\ncontexto de prueba\n"));
        assert!(prompt.contains("[PREGUNTA A RESPONDER]\n¿Qué sienten?\n"));
        assert!(prompt.contains("### 2. Análisis Filosófico"));
    }

    #[test]
    fn neutral_reading_has_empty_breakdown() {
        let emotion = detect_emotion(&["nada relevante aquí"]);
        let emotion = EmotionReading::from_counts(
            emotion.counts.into_iter().map(|(c, _)| (c, 0)).collect(),
        );
        let prompt = build_prompt("", "q", &emotion);
        assert!(prompt.contains("Emoción detectada: NEUTRAL/INDEFINIDO ()"));
    }
}
