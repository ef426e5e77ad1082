//! Sentence embeddings: the [`Embedder`] capability and its TEI
//! (Text Embeddings Inference) implementation.

use futures::future::BoxFuture;
use serde::Serialize;

use crate::error::RagError;

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 64;

/// Maps texts to fixed-length vectors, one per input, in input order.
pub trait Embedder {
    fn embed<'a>(
        &'a self,
        texts: &'a [&'a str],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>>;
}

/// TEI HTTP client.
pub struct TeiClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl TeiClient {
    /// Create a new `TeiClient` for the server at `tei_url`.
    #[must_use]
    pub fn new(tei_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/embed", tei_url.trim_end_matches('/')),
        }
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Texts are batched into groups of [`BATCH_SIZE`] (64) per request.
    /// Returns one embedding vector per input text, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Tei`] if the request fails, the response cannot
    /// be parsed, or TEI returns a different number of vectors than inputs.
    pub async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for (batch_no, chunk) in texts.chunks(BATCH_SIZE).enumerate() {
            let request = EmbedRequest { inputs: chunk };
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| RagError::Tei(format!("TEI request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(RagError::Tei(format!(
                    "TEI returned status {}",
                    response.status()
                )));
            }

            let embeddings: Vec<Vec<f32>> = response
                .json()
                .await
                .map_err(|e| RagError::Tei(format!("TEI response parse error: {e}")))?;

            if embeddings.len() != chunk.len() {
                return Err(RagError::Tei(format!(
                    "TEI returned {} embeddings for {} inputs",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            tracing::debug!(batch = batch_no, size = chunk.len(), "embedded batch");
            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }
}

impl Embedder for TeiClient {
    fn embed<'a>(
        &'a self,
        texts: &'a [&'a str],
    ) -> BoxFuture<'a, Result<Vec<Vec<f32>>, RagError>> {
        Box::pin(self.embed_texts(texts))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn embeds_in_batches_of_64() {
        let server = MockServer::start().await;
        let batch: Vec<Vec<f32>> = vec![vec![0.1, 0.2]; 64];
        let tail: Vec<Vec<f32>> = vec![vec![0.3, 0.4]; 6];

        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&batch))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&tail))
            .expect(1)
            .mount(&server)
            .await;

        let owned: Vec<String> = (0..70).map(|i| format!("t{i}")).collect();
        let texts: Vec<&str> = owned.iter().map(String::as_str).collect();
        let client = TeiClient::new(&format!("{}/", server.uri()));
        let vectors = client.embed(&texts).await.unwrap();

        assert_eq!(vectors.len(), 70);
        assert_eq!(vectors[63], vec![0.1, 0.2]);
        assert_eq!(vectors[64], vec![0.3, 0.4]);

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let second: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
        assert_eq!(second["inputs"].as_array().unwrap().len(), 6);
        assert_eq!(second["inputs"][0], "t64");
    }

    #[tokio::test]
    async fn count_mismatch_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([[0.1, 0.2]])))
            .mount(&server)
            .await;

        let client = TeiClient::new(&server.uri());
        let err = client.embed(&["uno", "dos"]).await.unwrap_err();
        assert!(err.to_string().contains("1 embeddings for 2 inputs"), "{err}");
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/embed"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = TeiClient::new(&server.uri());
        let err = client.embed(&["uno"]).await.unwrap_err();
        assert!(matches!(err, RagError::Tei(ref m) if m.contains("503")));
    }
}
