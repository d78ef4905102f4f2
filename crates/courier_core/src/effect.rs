#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Persist the edited base URL to the client config store.
    PersistBaseUrl { value: String },
    /// Issue one HTTP request against the backend. `base_url` is already
    /// normalized (no trailing slash).
    SendRequest {
        seq: crate::RequestSeq,
        base_url: String,
        request: BackendRequest,
    },
}

/// One backend operation, with artifact names pre-derived so the IO layer
/// only moves bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendRequest {
    CompileGui {
        source_path: String,
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
        image_path: String,
        image_name: String,
        use_ocr: bool,
        html_artifact_name: String,
        gui_artifact_name: String,
    },
}
