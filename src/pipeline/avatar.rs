//! Avatar-render stage (D-ID talks API)
//!
//! The only stage with server-side asynchronous completion: submitting a
//! render returns a job id that is then polled until the job reaches a
//! terminal state or the local attempt ceiling is hit. Hitting the
//! ceiling abandons the wait without cancelling the remote job.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::audio::AudioPayload;
use crate::config::AvatarOptions;
use crate::error::Stage;
use crate::pipeline::AvatarRenderer;
use crate::{Error, Result};

/// Default D-ID API root
const DID_API_BASE: &str = "https://api.d-id.com";

/// How often and how long a render job is polled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPolicy {
    /// Delay before each status check
    pub poll_interval: Duration,
    /// Maximum status checks before giving up locally
    pub max_attempts: u32,
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_attempts: 30, // one minute at the default interval
        }
    }
}

/// Response from the render submission endpoint
#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

/// Response from the render status endpoint
#[derive(Deserialize)]
struct StatusResponse {
    status: String,
    result_url: Option<String>,
    error: Option<StatusError>,
}

#[derive(Deserialize)]
struct StatusError {
    description: Option<String>,
}

/// Observed state of a render job after one status check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderStatus {
    /// Job accepted but not finished
    Pending,
    /// Job finished; the video is available at the contained URL
    Done(String),
    /// Job failed server-side with the contained detail
    Error(String),
}

impl From<StatusResponse> for RenderStatus {
    fn from(response: StatusResponse) -> Self {
        match response.status.as_str() {
            // "done" without a result URL is not terminal yet
            "done" => response.result_url.map_or(Self::Pending, Self::Done),
            "error" => Self::Error(
                response
                    .error
                    .and_then(|e| e.description)
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
            _ => Self::Pending,
        }
    }
}

/// Renders a talking-head video from synthesized speech
pub struct AvatarRenderClient {
    client: reqwest::Client,
    api_key: String,
    options: AvatarOptions,
    policy: RenderPolicy,
    base_url: String,
}

impl AvatarRenderClient {
    /// Create a render client with default options and polling policy
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, DID_API_BASE.to_string())
    }

    /// Create a client against a custom API root
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the API key is empty
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        if api_key.is_empty() {
            return Err(Error::MissingCredential("avatar-render"));
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            options: AvatarOptions::default(),
            policy: RenderPolicy::default(),
            base_url,
        })
    }

    /// Override the render options
    #[must_use]
    pub fn with_options(mut self, options: AvatarOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the polling policy
    #[must_use]
    pub fn with_policy(mut self, policy: RenderPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Submit a render job, returning its id
    async fn submit(&self, audio: &AudioPayload) -> Result<String> {
        let script = serde_json::json!({
            "source_url": self.options.source_url,
            "config": {
                "fluent": self.options.fluent,
                "stitch": self.options.stitch,
                "result_format": self.options.result_format,
                "align_driver": self.options.align_driver,
                "auto_match": self.options.auto_match,
            },
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "audio",
                reqwest::multipart::Part::bytes(audio.bytes().to_vec())
                    .file_name(audio.file_name())
                    .mime_str(audio.mime())?,
            )
            .text("script", script.to_string());

        let response = self
            .client
            .post(format!("{}/talks", self.base_url))
            .header("Authorization", format!("Basic {}", self.api_key))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "render submission rejected");
            return Err(Error::Upstream {
                stage: Stage::RenderSubmit,
                status: status.as_u16(),
                detail: body,
            });
        }

        let result: SubmitResponse = response.json().await?;
        Ok(result.id)
    }

    /// Query the current state of a render job
    async fn poll(&self, job_id: &str) -> Result<RenderStatus> {
        let response = self
            .client
            .get(format!("{}/talks/{job_id}", self.base_url))
            .header("Authorization", format!("Basic {}", self.api_key))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "render status check failed");
            return Err(Error::Upstream {
                stage: Stage::RenderPoll,
                status: status.as_u16(),
                detail: body,
            });
        }

        let result: StatusResponse = response.json().await?;
        Ok(RenderStatus::from(result))
    }
}

#[async_trait]
impl AvatarRenderer for AvatarRenderClient {
    async fn render(&self, audio: &AudioPayload) -> Result<String> {
        tracing::debug!(audio_bytes = audio.len(), "submitting render job");
        let job_id = self.submit(audio).await?;
        tracing::debug!(job_id = %job_id, "render job accepted");

        for attempt in 1..=self.policy.max_attempts {
            tokio::time::sleep(self.policy.poll_interval).await;

            match self.poll(&job_id).await? {
                RenderStatus::Done(url) => {
                    tracing::info!(job_id = %job_id, attempt, video_url = %url, "render complete");
                    return Ok(url);
                }
                RenderStatus::Error(detail) => {
                    tracing::error!(job_id = %job_id, attempt, detail = %detail, "render failed");
                    return Err(Error::RenderFailed { detail });
                }
                RenderStatus::Pending => {
                    tracing::debug!(job_id = %job_id, attempt, "render still pending");
                }
            }
        }

        // The remote job keeps running; only the local wait is abandoned
        tracing::warn!(job_id = %job_id, attempts = self.policy.max_attempts, "render poll ceiling reached");
        Err(Error::RenderTimeout {
            attempts: self.policy.max_attempts,
        })
    }
}
