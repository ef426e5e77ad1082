//! Incrementally written Markdown report.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::RagError;

const TITLE: &str = "# INFORME DE INVESTIGACIÓN: CRISIS DE SENTIDO EN LA GEN Z";

fn rule() -> String {
    "-".repeat(50)
}

/// Writes the report header once, then one section per answered question.
///
/// Every section is flushed as soon as it is written, so an interrupted run
/// leaves all completed sections on disk.
#[derive(Debug)]
pub struct ReportWriter<W: Write> {
    out: W,
    label: String,
    sections: usize,
}

impl ReportWriter<BufWriter<File>> {
    /// Create (or truncate) the report at `path` and write its header.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Io`] if the file cannot be created or written.
    pub fn create(path: &Path, model: &str) -> Result<Self, RagError> {
        let file = File::create(path).map_err(|e| RagError::io(path, e))?;
        Self::new(BufWriter::new(file), &path.display().to_string(), model)
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap `out` and write the header. `label` names the destination in
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Io`] if the header cannot be written.
    pub fn new(out: W, label: &str, model: &str) -> Result<Self, RagError> {
        let mut writer = Self {
            out,
            label: label.to_string(),
            sections: 0,
        };
        let header = format!(
            "{TITLE}\nGenerado automáticamente por Sistema RAG con Modelo {model}\n{}\n\n",
            rule()
        );
        writer.write_flushed(&header)?;
        Ok(writer)
    }

    /// Append the section for question `number` (1-based) and flush.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Io`] if the write or flush fails.
    pub fn append_section(
        &mut self,
        number: usize,
        question: &str,
        emotion: &str,
        answer: &str,
    ) -> Result<(), RagError> {
        let section = format!(
            "## PREGUNTA {number}: {question}\n\n**Emoción detectada:** {}\n\n{answer}\n\n{}\n\n",
            emotion.to_uppercase(),
            rule()
        );
        self.write_flushed(&section)?;
        self.sections += 1;
        Ok(())
    }

    /// Sections written so far.
    #[must_use]
    pub fn sections(&self) -> usize {
        self.sections
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_flushed(&mut self, text: &str) -> Result<(), RagError> {
        self.out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
            .map_err(|e| RagError::Io {
                path: self.label.clone(),
                source: e,
            })
    }
}
