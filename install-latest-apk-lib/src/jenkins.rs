use crate::config::Config;
use crate::error::{ApkError, Result};
use crate::logging::spinner_style;
use crate::resolver::{Artifact, ArtifactManifest};
use crate::source::{ArtifactDownload, ArtifactSource};
use futures_util::{StreamExt, TryStreamExt};
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::{Client, Response};
use tracing::instrument;
use tracing_indicatif::span_ext::IndicatifSpanExt;

const USER_AGENT: &str = concat!("install-latest-apk/", env!("CARGO_PKG_VERSION"));

/// Talks to the JSON API of a Jenkins job.
pub struct JenkinsClient {
    config: Config,
    client: Client,
}

impl JenkinsClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    async fn get(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApkError::Http {
                status: response.status(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

impl ArtifactSource for JenkinsClient {
    #[instrument(skip_all)]
    async fn artifacts(&self) -> Result<Vec<Artifact>> {
        let current_span = tracing::Span::current();
        current_span.pb_set_style(&spinner_style("{msg}"));
        current_span.pb_set_message("Fetching artifacts of the last successful build...");
        current_span.pb_set_finish_message("Fetching artifacts of the last successful build... Done");

        let response = self.get(&self.config.manifest_url()).await?;

        // The manifest may span several chunks; only parse the complete body.
        let body = response.bytes().await?;
        let manifest: ArtifactManifest = serde_json::from_slice(&body)?;

        Ok(manifest.artifacts)
    }

    async fn open_artifact(&self, relative_path: &str) -> Result<ArtifactDownload> {
        tracing::info!("Connecting …");
        let url = self.config.artifact_url(relative_path);
        let response = self.get(url.as_str()).await?;
        let content_length = content_length(response.headers());

        let body = response
            .bytes_stream()
            .map_err(std::io::Error::other)
            .boxed();

        Ok(ArtifactDownload {
            content_length,
            body,
        })
    }
}

/// Reads the `content-length` header as announced, without trusting the body.
fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
