use crate::error::Result;
use crate::resolver::Artifact;
use bytes::Bytes;
use futures_util::stream::BoxStream;

/// An artifact response whose body has not been read yet.
pub struct ArtifactDownload {
    /// Size announced by the server, `None` when missing or unparsable.
    pub content_length: Option<u64>,
    pub body: BoxStream<'static, std::io::Result<Bytes>>,
}

/// Where build artifacts come from.
pub trait ArtifactSource {
    /// Lists the artifacts of the last successful build, in server order.
    fn artifacts(&self) -> impl Future<Output = Result<Vec<Artifact>>> + Send;

    fn open_artifact(
        &self,
        relative_path: &str,
    ) -> impl Future<Output = Result<ArtifactDownload>> + Send;
}
