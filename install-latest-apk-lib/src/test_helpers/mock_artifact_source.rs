use crate::error::Result;
use crate::resolver::Artifact;
use crate::source::{ArtifactDownload, ArtifactSource};
use bytes::Bytes;
use futures_util::StreamExt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const CHUNK_SIZE: usize = 256;

/// Serves a fixed artifact list and payload from memory, counting how much
/// of the body gets consumed.
pub struct MockArtifactSource {
    artifacts: Vec<Artifact>,
    payload: Vec<u8>,
    content_length: Option<u64>,
    fail_after_chunks: Option<usize>,
    opened: AtomicUsize,
    chunks_read: Arc<AtomicUsize>,
}

impl MockArtifactSource {
    pub fn with_payload(payload: Vec<u8>) -> Self {
        Self {
            artifacts: vec![Artifact {
                file_name: "app-debug.apk".to_string(),
                relative_path: "build/outputs/app-debug.apk".to_string(),
            }],
            content_length: Some(payload.len() as u64),
            payload,
            fail_after_chunks: None,
            opened: AtomicUsize::new(0),
            chunks_read: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_artifacts(self, artifacts: Vec<Artifact>) -> Self {
        Self { artifacts, ..self }
    }

    pub fn without_content_length(self) -> Self {
        Self {
            content_length: None,
            ..self
        }
    }

    /// The body yields an error once `chunks` chunks have been read.
    pub fn failing_after(self, chunks: usize) -> Self {
        Self {
            fail_after_chunks: Some(chunks),
            ..self
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn chunks_read(&self) -> usize {
        self.chunks_read.load(Ordering::SeqCst)
    }
}

impl ArtifactSource for MockArtifactSource {
    async fn artifacts(&self) -> Result<Vec<Artifact>> {
        Ok(self.artifacts.clone())
    }

    async fn open_artifact(&self, _relative_path: &str) -> Result<ArtifactDownload> {
        self.opened.fetch_add(1, Ordering::SeqCst);

        let mut chunks: Vec<std::io::Result<Bytes>> = self
            .payload
            .chunks(CHUNK_SIZE)
            .map(|chunk| Ok(Bytes::copy_from_slice(chunk)))
            .collect();
        if let Some(limit) = self.fail_after_chunks {
            chunks.truncate(limit);
            chunks.push(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            )));
        }

        let chunks_read = self.chunks_read.clone();
        let body = futures_util::stream::iter(chunks)
            .inspect(move |_| {
                chunks_read.fetch_add(1, Ordering::SeqCst);
            })
            .boxed();

        Ok(ArtifactDownload {
            content_length: self.content_length,
            body,
        })
    }
}
