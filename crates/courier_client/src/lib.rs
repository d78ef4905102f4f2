//! Courier client engine: backend HTTP calls and artifact persistence.
mod backend;
mod engine;
mod persist;
mod types;

pub use backend::{Backend, HttpBackend, ProgressSink, RequestSettings};
pub use engine::ClientHandle;
pub use persist::{ensure_artifacts_dir, ArtifactStore, AtomicFileWriter, PersistError};
pub use types::{
    ClientEvent, ImageToGuiResponse, RequestError, RequestOutcome, RequestProgress, RequestSeq,
    RequestSpec, Stage, StoredArtifact,
};
