use crate::utils::sanitize_filename;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, StatusCode, multipart};
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Upload name used when neither the response nor the URL supplies one
pub const FALLBACK_FILENAME: &str = "downloaded_file";

static FILENAME_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="([^"]+)""#).expect("Filename pattern should be valid"));

/// Faults of one thumbnail round trip
#[derive(Error, Debug)]
pub enum RecognitionError {
    #[error("download failed: {0}")]
    Download(#[source] reqwest::Error),

    #[error("download failed: HTTP {0}")]
    DownloadStatus(StatusCode),

    #[error("upload failed: {0}")]
    Upload(#[source] reqwest::Error),

    #[error("upload failed: HTTP {0}")]
    UploadStatus(StatusCode),

    #[error("malformed recognition response: {0}")]
    Response(#[source] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    text: String,
}

/// Client for the local image-to-text service
#[derive(Debug, Clone)]
pub struct RecognitionClient {
    client: Client,
    endpoint: Url,
}

impl RecognitionClient {
    /// Create a client posting to `endpoint`
    pub fn new(endpoint: Url, request_timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// Recognizes the text on the image at `image_url`
    ///
    /// Never fails: any download, upload or decoding fault is logged and
    /// reported as `None`.
    pub async fn recognize(&self, image_url: &Url) -> Option<String> {
        match self.try_recognize(image_url).await {
            Ok(text) => {
                ::log::info!("Recognized {} chars from {}", text.chars().count(), image_url);
                ::log::debug!("Text of {}: {:?}", image_url, text);
                Some(text)
            }
            Err(e) => {
                ::log::error!("Recognition of {} failed: {}", image_url, e);
                None
            }
        }
    }

    async fn try_recognize(&self, image_url: &Url) -> Result<String, RecognitionError> {
        let response = self
            .client
            .get(image_url.clone())
            .send()
            .await
            .map_err(RecognitionError::Download)?;
        if !response.status().is_success() {
            return Err(RecognitionError::DownloadStatus(response.status()));
        }

        let headers = response.headers();
        let file_name = derive_filename(
            headers.get(CONTENT_DISPOSITION).and_then(|v| v.to_str().ok()),
            image_url,
        );
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(RecognitionError::Download)?;
        ::log::debug!(
            "Downloaded {} ({} bytes) as {}",
            image_url,
            body.len(),
            file_name
        );

        let part = file_part(&body, file_name, content_type.as_deref());
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(RecognitionError::Upload)?;
        if !response.status().is_success() {
            return Err(RecognitionError::UploadStatus(response.status()));
        }

        let result: RecognitionResponse =
            response.json().await.map_err(RecognitionError::Response)?;
        Ok(result.text)
    }
}

/// The upload part for a downloaded image, typed with its content type when
/// that parses as a MIME type
fn file_part(body: &[u8], file_name: String, content_type: Option<&str>) -> multipart::Part {
    let untyped = || multipart::Part::bytes(body.to_vec()).file_name(file_name.clone());
    match content_type {
        Some(mime) => untyped().mime_str(mime).unwrap_or_else(|e| {
            ::log::warn!("Ignoring content type {:?} of {}: {}", mime, file_name, e);
            untyped()
        }),
        None => untyped(),
    }
}

/// Picks the upload file name for a downloaded image
///
/// Prefers the quoted `filename` of a `content-disposition` header, then the
/// last path segment of the URL, then [`FALLBACK_FILENAME`]. Every candidate
/// is sanitized since both sources are server-controlled.
pub fn derive_filename(content_disposition: Option<&str>, url: &Url) -> String {
    let from_header = content_disposition
        .and_then(|value| FILENAME_PARAM.captures(value))
        .map(|caps| sanitize_filename(&caps[1]))
        .filter(|name| !name.is_empty());
    if let Some(name) = from_header {
        return name;
    }

    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(sanitize_filename)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILENAME.to_string())
}
