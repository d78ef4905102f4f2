use crate::base_url::normalize_base_url;
use crate::view_model::{AppViewModel, ArtifactRowView};

pub type RequestSeq = u64;

/// Prompt shown when a `.gui` submit has no file selected.
pub const SELECT_FILE_PROMPT: &str = "Select a .gui file first.";
/// Prompt shown when an image submit has no file selected.
pub const SELECT_IMAGE_PROMPT: &str = "Select an image file first.";
/// Prompt shown when a site action has an empty URL input.
pub const ENTER_URL_PROMPT: &str = "Enter a site URL first.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    CompileGui,
    Health,
    FetchSite,
    AnalyzeSite,
    ImageToGui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Sending,
    Downloading,
    Saving,
}

/// Tone of the status line, mirroring the ok/error styling of the status
/// area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusTone {
    #[default]
    Neutral,
    Ok,
    Error,
}

/// A stored response artifact: derived filename, where it was written, and
/// its size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub file_name: String,
    pub path: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingRequest {
    seq: RequestSeq,
    kind: ActionKind,
    stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    base_url_input: String,
    next_seq: RequestSeq,
    pending: Option<PendingRequest>,
    status_text: String,
    status_tone: StatusTone,
    artifacts: Vec<ArtifactInfo>,
    analysis: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            base_url: self.base_url_input.clone(),
            status_text: self.status_text.clone(),
            status_tone: self.status_tone,
            busy: self.pending.is_some(),
            stage: self.pending.as_ref().map(|p| p.stage),
            artifacts: self
                .artifacts
                .iter()
                .map(|a| ArtifactRowView {
                    file_name: a.file_name.clone(),
                    path: a.path.clone(),
                    bytes: a.bytes,
                })
                .collect(),
            analysis: self.analysis.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        let was = self.dirty;
        self.dirty = false;
        was
    }

    /// Base URL as used for requests: trailing slash stripped.
    pub fn effective_base_url(&self) -> String {
        normalize_base_url(&self.base_url_input)
    }

    pub(crate) fn set_base_url(&mut self, value: String) {
        self.base_url_input = value;
        self.dirty = true;
    }

    pub(crate) fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.status_text = text.into();
        self.status_tone = tone;
        self.dirty = true;
    }

    /// Begin a new request: bump the sequence token and replace any pending
    /// action, whose late events become stale.
    pub(crate) fn begin_request(&mut self, kind: ActionKind, status_text: &str) -> RequestSeq {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending = Some(PendingRequest {
            seq,
            kind,
            stage: Stage::Sending,
        });
        self.set_status(status_text, StatusTone::Neutral);
        seq
    }

    /// Drop results of the previous action, the way the page blanks the
    /// preview and hides the download link when a new submit starts.
    pub(crate) fn clear_results(&mut self) {
        self.artifacts.clear();
        self.analysis = None;
        self.dirty = true;
    }

    /// Current pending action, if the given token is still the live one.
    pub(crate) fn pending_kind_for(&self, seq: RequestSeq) -> Option<ActionKind> {
        self.pending
            .as_ref()
            .filter(|p| p.seq == seq)
            .map(|p| p.kind)
    }

    pub(crate) fn set_stage(&mut self, seq: RequestSeq, stage: Stage) {
        if let Some(pending) = self.pending.as_mut() {
            if pending.seq == seq {
                pending.stage = stage;
                self.dirty = true;
            }
        }
    }

    pub(crate) fn clear_pending(&mut self) {
        self.pending = None;
        self.dirty = true;
    }

    pub(crate) fn set_artifacts(&mut self, artifacts: Vec<ArtifactInfo>) {
        self.artifacts = artifacts;
        self.dirty = true;
    }

    pub(crate) fn set_analysis(&mut self, report: String) {
        self.analysis = Some(report);
        self.dirty = true;
    }
}
