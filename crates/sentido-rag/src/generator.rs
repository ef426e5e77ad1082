//! Text generation: the [`TextGenerator`] capability and its `ollama`
//! subprocess implementation.

use std::process::Stdio;

use futures::future::BoxFuture;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::RagError;

/// Turns a prompt into an answer.
pub trait TextGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, RagError>>;
}

/// Runs `<command> run <model>` with the prompt on stdin.
///
/// Stdout is decoded lossily and trailing whitespace is trimmed; stderr is
/// discarded. There is no timeout: a call lasts as long as the model takes.
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    command: String,
    model: String,
}

impl OllamaGenerator {
    #[must_use]
    pub fn new(command: &str, model: &str) -> Self {
        Self {
            command: command.to_string(),
            model: model.to_string(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn subprocess_error(&self, e: &std::io::Error) -> RagError {
        RagError::Generator(format!("{} subprocess error: {e}", self.command))
    }

    /// Run the subprocess once.
    ///
    /// A non-zero exit is logged and whatever the process printed is still
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Generator`] if the process cannot be spawned or
    /// its stdin cannot be written.
    pub async fn run(&self, prompt: &str) -> Result<String, RagError> {
        let mut child = Command::new(&self.command)
            .args(["run", self.model.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.subprocess_error(&e))?;

        // Feed stdin from its own task so a child that writes while it reads
        // cannot fill the stdout pipe and stall both sides.
        let writer = child.stdin.take().map(|mut stdin| {
            let prompt = prompt.to_string();
            tokio::spawn(async move {
                let written = stdin.write_all(prompt.as_bytes()).await;
                drop(stdin);
                written
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.subprocess_error(&e))?;

        if let Some(writer) = writer {
            let written = writer
                .await
                .map_err(|e| RagError::Generator(format!("prompt writer task failed: {e}")))?;
            match written {
                Ok(()) => {}
                // The process exited without reading all of its input; its output still counts.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!(command = self.command.as_str(), "generator closed stdin early");
                }
                Err(e) => {
                    return Err(RagError::Generator(format!("failed to write prompt: {e}")));
                }
            }
        }

        if !output.status.success() {
            tracing::warn!(
                command = self.command.as_str(),
                model = self.model.as_str(),
                status = %output.status,
                "generator returned non-zero exit"
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

impl TextGenerator for OllamaGenerator {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, RagError>> {
        Box::pin(self.run(prompt))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    use super::*;

    /// Write an executable shell script standing in for `ollama`.
    fn fake_command(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("sentido-gen-{}-{name}", std::process::id()));
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[tokio::test]
    async fn echoes_stdin_and_trims_trailing_whitespace() {
        let script = fake_command("echo", r#"printf 'model=%s\n' "$2"; cat; printf '\n\n  '"#);
        let generator = OllamaGenerator::new(script.to_str().unwrap(), "mistral");

        let answer = generator.generate("  hola").await.unwrap();
        assert_eq!(answer, "model=mistral\n  hola");
        std::fs::remove_file(&script).ok();
    }

    #[tokio::test]
    async fn stderr_is_discarded_and_failure_still_returns_stdout() {
        let script = fake_command("fail", "echo ruido >&2; echo parcial; exit 3");
        let generator = OllamaGenerator::new(script.to_str().unwrap(), "m");

        let answer = generator.generate("x").await.unwrap();
        assert_eq!(answer, "parcial");
        std::fs::remove_file(&script).ok();
    }

    #[tokio::test]
    async fn large_prompt_streamed_back_does_not_stall() {
        let script = fake_command("cat", "cat");
        let generator = OllamaGenerator::new(script.to_str().unwrap(), "m");
        let prompt = "a".repeat(400 * 500);

        let answer = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            generator.generate(&prompt),
        )
        .await
        .expect("generator finished within 10s")
        .unwrap();
        assert_eq!(answer.len(), prompt.len());
        std::fs::remove_file(&script).ok();
    }

    #[tokio::test]
    async fn missing_command_is_an_error() {
        let generator = OllamaGenerator::new("/nonexistent/sentido-ollama", "m");
        let err = generator.generate("x").await.unwrap_err();
        assert!(matches!(err, RagError::Generator(_)));
    }
}
