//! Courier core: pure state machine and view-model helpers for the client.
mod base_url;
mod effect;
mod filename;
mod msg;
mod state;
mod update;
mod view_model;

pub use base_url::{normalize_base_url, resolve_base_url, DEFAULT_BACKEND_URL};
pub use effect::{BackendRequest, Effect};
pub use filename::{compiled_artifact_name, image_artifact_names, site_artifact_name};
pub use msg::{ActionOutcome, Msg, RequestFailure, SelectedFile};
pub use state::{
    ActionKind, AppState, ArtifactInfo, RequestSeq, Stage, StatusTone, ENTER_URL_PROMPT,
    SELECT_FILE_PROMPT, SELECT_IMAGE_PROMPT,
};
pub use update::update;
pub use view_model::{AppViewModel, ArtifactRowView};
