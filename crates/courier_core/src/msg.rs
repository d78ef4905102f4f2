/// A file the user picked for upload: display name plus the path the IO
/// layer reads at submit time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Effective base URL resolved at startup, seeded into the input.
    BaseUrlResolved(String),
    /// User edited the base URL input; the new value is persisted.
    BaseUrlEdited(String),
    /// User submitted a `.gui` file for compilation.
    CompileRequested { file: Option<SelectedFile> },
    /// User asked for a backend liveness probe.
    HealthRequested,
    /// User asked the backend to fetch a site's HTML.
    FetchSiteRequested { url: String },
    /// User asked the backend to analyze a site.
    AnalyzeRequested { url: String },
    /// User submitted an image for GUI generation.
    ImageRequested {
        file: Option<SelectedFile>,
        use_ocr: bool,
    },
    /// Engine progress for an in-flight request.
    RequestProgress {
        seq: crate::RequestSeq,
        stage: crate::Stage,
    },
    /// Engine completion for a request.
    RequestCompleted {
        seq: crate::RequestSeq,
        outcome: Result<ActionOutcome, RequestFailure>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Successful result of a backend action, as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Compiled {
        artifact: crate::ArtifactInfo,
    },
    Healthy {
        http_status: u16,
        service_status: Option<String>,
    },
    SiteFetched {
        artifact: crate::ArtifactInfo,
    },
    SiteAnalyzed {
        /// Pretty-printed JSON report, rendered verbatim.
        report: String,
    },
    ImageGenerated {
        html: crate::ArtifactInfo,
        gui: crate::ArtifactInfo,
        ocr_used: bool,
    },
}

/// Terminal failure of a backend action. The engine formats the HTTP or
/// transport detail into `message`; the core only displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestFailure {
    pub message: String,
}

impl RequestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
