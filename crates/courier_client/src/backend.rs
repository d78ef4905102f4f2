use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::types::{
    ClientEvent, ImageToGuiResponse, RequestError, RequestProgress, RequestSeq, Stage,
};

#[derive(Debug, Clone)]
pub struct RequestSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<ClientEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}

/// Wire-level operations against the compilation service. One method per
/// endpoint; artifact persistence stays out of this seam.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn compile_gui(
        &self,
        seq: RequestSeq,
        base_url: &str,
        source_name: &str,
        source: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, RequestError>;

    async fn health(&self, base_url: &str) -> Result<(u16, Option<String>), RequestError>;

    async fn fetch_site(
        &self,
        seq: RequestSeq,
        base_url: &str,
        site_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, RequestError>;

    async fn analyze_site(
        &self,
        base_url: &str,
        site_url: &str,
    ) -> Result<serde_json::Value, RequestError>;

    async fn image_to_gui(
        &self,
        base_url: &str,
        image_name: &str,
        image: Vec<u8>,
        use_ocr: bool,
    ) -> Result<ImageToGuiResponse, RequestError>;
}

/// `Backend` implementation over reqwest.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    settings: RequestSettings,
}

/// Body of `GET /healthz`. Anything unparsable degrades to the empty default.
#[derive(Debug, Default, Deserialize)]
struct HealthBody {
    status: Option<String>,
}

impl HttpBackend {
    pub fn new(settings: RequestSettings) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| RequestError::Network(err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, base_url: &str, path: &str) -> Result<reqwest::Url, RequestError> {
        reqwest::Url::parse(&format!("{base_url}/{path}"))
            .map_err(|err| RequestError::InvalidUrl(err.to_string()))
    }

    /// Stream the response body with the configured size cap, reporting
    /// download progress when a sink is given.
    async fn read_body_capped(
        &self,
        response: reqwest::Response,
        seq: RequestSeq,
        sink: Option<&dyn ProgressSink>,
    ) -> Result<Vec<u8>, RequestError> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(RequestError::TooLarge { max_bytes });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(RequestError::TooLarge { max_bytes });
            }
            bytes.extend_from_slice(&chunk);
            if let Some(sink) = sink {
                sink.emit(ClientEvent::Progress(RequestProgress {
                    seq,
                    stage: Stage::Downloading,
                    bytes: Some(bytes.len() as u64),
                }));
            }
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn compile_gui(
        &self,
        seq: RequestSeq,
        base_url: &str,
        source_name: &str,
        source: Vec<u8>,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, RequestError> {
        let url = self.endpoint(base_url, "compile-gui")?;
        let form = Form::new().part(
            "file",
            Part::bytes(source).file_name(source_name.to_string()),
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        self.read_body_capped(response, seq, Some(sink)).await
    }

    async fn health(&self, base_url: &str) -> Result<(u16, Option<String>), RequestError> {
        let url = self.endpoint(base_url, "healthz")?;
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let http_status = response.status().as_u16();
        let bytes = self.read_body_capped(response, 0, None).await?;
        // Parse failure is tolerated; the probe only cares about the status
        // field when one is present.
        let body: HealthBody = serde_json::from_slice(&bytes).unwrap_or_default();
        Ok((http_status, body.status))
    }

    async fn fetch_site(
        &self,
        seq: RequestSeq,
        base_url: &str,
        site_url: &str,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<u8>, RequestError> {
        let mut url = self.endpoint(base_url, "fetch-url")?;
        url.query_pairs_mut().append_pair("url", site_url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        self.read_body_capped(response, seq, Some(sink)).await
    }

    async fn analyze_site(
        &self,
        base_url: &str,
        site_url: &str,
    ) -> Result<serde_json::Value, RequestError> {
        let mut url = self.endpoint(base_url, "analyze-url")?;
        url.query_pairs_mut().append_pair("url", site_url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let bytes = self.read_body_capped(response, 0, None).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| RequestError::MalformedResponse(err.to_string()))
    }

    async fn image_to_gui(
        &self,
        base_url: &str,
        image_name: &str,
        image: Vec<u8>,
        use_ocr: bool,
    ) -> Result<ImageToGuiResponse, RequestError> {
        let mut url = self.endpoint(base_url, "image-to-gui")?;
        if use_ocr {
            url.query_pairs_mut().append_pair("ocr", "1");
        }
        let form = Form::new().part(
            "file",
            Part::bytes(image).file_name(image_name.to_string()),
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let response = check_status(response).await?;
        let bytes = self.read_body_capped(response, 0, None).await?;
        serde_json::from_slice(&bytes)
            .map_err(|err| RequestError::MalformedResponse(err.to_string()))
    }
}

/// Pass successful responses through; turn anything else into `Http` with
/// the error body as detail.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RequestError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.bytes().await.unwrap_or_default();
    let mut detail = error_detail(&body);
    if detail.is_empty() {
        detail = status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string();
    }
    Err(RequestError::Http {
        code: status.as_u16(),
        detail,
    })
}

/// Older deployments answer errors as JSON `{"detail": ...}`; newer ones as
/// plain text. Surface whichever is present.
fn error_detail(body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }
    String::from_utf8_lossy(body).trim().to_string()
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::Timeout(err.to_string());
    }
    RequestError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::error_detail;

    #[test]
    fn json_detail_field_is_extracted() {
        assert_eq!(
            error_detail(br#"{"detail": "Only .gui files are accepted for now"}"#),
            "Only .gui files are accepted for now"
        );
    }

    #[test]
    fn plain_text_body_is_passed_through() {
        assert_eq!(error_detail(b"Parsing Error\n"), "Parsing Error");
    }

    #[test]
    fn json_without_detail_falls_back_to_raw_text() {
        assert_eq!(error_detail(br#"{"error": "nope"}"#), r#"{"error": "nope"}"#);
    }
}
