use std::path::PathBuf;
use std::time::Duration;

use client_logging::client_info;
use courier_core::{ActionOutcome, ArtifactInfo, BackendRequest, Effect, Msg, RequestFailure};
use courier_client::{ClientEvent, ClientHandle, RequestOutcome, RequestSpec, StoredArtifact};

use super::persistence;

/// Executes core effects against the IO engine and maps engine events back
/// into core messages.
pub(crate) struct EffectRunner {
    handle: ClientHandle,
    artifacts_dir: PathBuf,
}

impl EffectRunner {
    pub(crate) fn new(handle: ClientHandle, artifacts_dir: PathBuf) -> Self {
        Self {
            handle,
            artifacts_dir,
        }
    }

    pub(crate) fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PersistBaseUrl { value } => {
                    persistence::save_backend_url(&self.artifacts_dir, &value);
                }
                Effect::SendRequest {
                    seq,
                    base_url,
                    request,
                } => {
                    client_logging::set_request_seq(seq);
                    client_info!("SendRequest seq={} base_url={}", seq, base_url);
                    self.handle.submit(seq, base_url, map_request(request));
                }
            }
        }
    }

    /// Next engine event as a core message, or `None` on timeout.
    pub(crate) fn poll(&self, timeout: Duration) -> Option<Msg> {
        self.handle.recv_timeout(timeout).map(map_event)
    }
}

fn map_request(request: BackendRequest) -> RequestSpec {
    match request {
        BackendRequest::CompileGui {
            source_path,
            source_name,
            artifact_name,
        } => RequestSpec::CompileGui {
            source_path: PathBuf::from(source_path),
            source_name,
            artifact_name,
        },
        BackendRequest::Health => RequestSpec::Health,
        BackendRequest::FetchSite {
            site_url,
            artifact_name,
        } => RequestSpec::FetchSite {
            site_url,
            artifact_name,
        },
        BackendRequest::AnalyzeSite { site_url } => RequestSpec::AnalyzeSite { site_url },
        BackendRequest::ImageToGui {
            image_path,
            image_name,
            use_ocr,
            html_artifact_name,
            gui_artifact_name,
        } => RequestSpec::ImageToGui {
            image_path: PathBuf::from(image_path),
            image_name,
            use_ocr,
            html_artifact_name,
            gui_artifact_name,
        },
    }
}

fn map_event(event: ClientEvent) -> Msg {
    match event {
        ClientEvent::Progress(progress) => Msg::RequestProgress {
            seq: progress.seq,
            stage: map_stage(progress.stage),
        },
        ClientEvent::RequestCompleted { seq, result } => Msg::RequestCompleted {
            seq,
            outcome: result
                .map(map_outcome)
                .map_err(|err| RequestFailure::new(err.to_string())),
        },
    }
}

fn map_stage(stage: courier_client::Stage) -> courier_core::Stage {
    match stage {
        courier_client::Stage::Sending => courier_core::Stage::Sending,
        courier_client::Stage::Downloading => courier_core::Stage::Downloading,
        courier_client::Stage::Saving => courier_core::Stage::Saving,
    }
}

fn map_outcome(outcome: RequestOutcome) -> ActionOutcome {
    match outcome {
        RequestOutcome::Compiled { artifact } => ActionOutcome::Compiled {
            artifact: map_artifact(artifact),
        },
        RequestOutcome::Healthy {
            http_status,
            service_status,
        } => ActionOutcome::Healthy {
            http_status,
            service_status,
        },
        RequestOutcome::SiteFetched { artifact } => ActionOutcome::SiteFetched {
            artifact: map_artifact(artifact),
        },
        RequestOutcome::SiteAnalyzed { report } => ActionOutcome::SiteAnalyzed { report },
        RequestOutcome::ImageGenerated {
            html,
            gui,
            ocr_used,
        } => ActionOutcome::ImageGenerated {
            html: map_artifact(html),
            gui: map_artifact(gui),
            ocr_used,
        },
    }
}

fn map_artifact(artifact: StoredArtifact) -> ArtifactInfo {
    ArtifactInfo {
        file_name: artifact.file_name,
        path: artifact.path.display().to_string(),
        bytes: artifact.bytes,
    }
}
