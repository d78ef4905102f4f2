use std::path::PathBuf;

use serde::Deserialize;

use crate::persist::PersistError;

pub type RequestSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sending,
    Downloading,
    Saving,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestProgress {
    pub seq: RequestSeq,
    pub stage: Stage,
    pub bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    Progress(RequestProgress),
    RequestCompleted {
        seq: RequestSeq,
        result: Result<RequestOutcome, RequestError>,
    },
}

/// One backend operation to execute. Artifact names are already derived; the
/// engine only moves bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestSpec {
    CompileGui {
        source_path: PathBuf,
        source_name: String,
        artifact_name: String,
    },
    Health,
    FetchSite {
        site_url: String,
        artifact_name: String,
    },
    AnalyzeSite {
        site_url: String,
    },
    ImageToGui {
        image_path: PathBuf,
        image_name: String,
        use_ocr: bool,
        html_artifact_name: String,
        gui_artifact_name: String,
    },
}

/// An artifact written to the artifacts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
    pub file_name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Compiled {
        artifact: StoredArtifact,
    },
    Healthy {
        http_status: u16,
        service_status: Option<String>,
    },
    SiteFetched {
        artifact: StoredArtifact,
    },
    SiteAnalyzed {
        /// Pretty-printed JSON, passed through verbatim.
        report: String,
    },
    ImageGenerated {
        html: StoredArtifact,
        gui: StoredArtifact,
        ocr_used: bool,
    },
}

/// Success body of `POST /image-to-gui`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageToGuiResponse {
    pub html: String,
    pub gui: String,
    #[serde(default)]
    pub ocr_used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    /// Non-success status; `detail` carries the error body (or its JSON
    /// `detail` field when the body is shaped that way).
    #[error("HTTP {code}: {detail}")]
    Http { code: u16, detail: String },
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("response too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: u64 },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("could not read {path}: {message}")]
    FileRead { path: String, message: String },
    #[error(transparent)]
    Persist(#[from] PersistError),
}
