//! Temporary image hosting via tmpfiles.org
//!
//! Uploaded files expire server-side after one hour; the returned URL is
//! handed straight back to the client.

use std::path::Path;
use std::time::Duration;

use super::RenderError;

const UPLOAD_ENDPOINT: &str = "https://tmpfiles.org/api/v1/upload";
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the tmpfiles.org upload API
#[derive(Debug, Clone)]
pub struct TmpfilesClient {
    endpoint: String,
}

impl TmpfilesClient {
    pub fn new() -> Self {
        Self {
            endpoint: UPLOAD_ENDPOINT.to_string(),
        }
    }

    /// Point the client at a different endpoint (testing, self-hosting)
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    /// Upload a file and return its public download URL
    pub fn upload(&self, path: &Path) -> Result<String, RenderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .map_err(|err| RenderError::Upload(err.to_string()))?;

        let form = reqwest::blocking::multipart::Form::new().file("file", path)?;

        let response = client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|err| RenderError::Upload(err.to_string()))?;

        if !response.status().is_success() {
            return Err(RenderError::Upload(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|err| RenderError::Upload(err.to_string()))?;

        if body.get("status").and_then(|status| status.as_str()) != Some("success") {
            return Err(RenderError::Upload("unexpected response payload".to_string()));
        }

        let url = body
            .pointer("/data/url")
            .and_then(|url| url.as_str())
            .ok_or_else(|| RenderError::Upload("missing url in response".to_string()))?;

        Ok(download_url(url))
    }
}

impl Default for TmpfilesClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Rewrite a tmpfiles viewer URL into the direct-download form
fn download_url(url: &str) -> String {
    url.replace("tmpfiles.org/", "tmpfiles.org/dl/")
}
