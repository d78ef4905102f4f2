use std::path::{Path, PathBuf};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::{client_info, client_warn};

use crate::backend::{Backend, ChannelProgressSink, HttpBackend, ProgressSink, RequestSettings};
use crate::persist::ArtifactStore;
use crate::types::{
    ClientEvent, RequestError, RequestOutcome, RequestProgress, RequestSeq, RequestSpec, Stage,
};

enum ClientCommand {
    Submit {
        seq: RequestSeq,
        base_url: String,
        spec: RequestSpec,
    },
}

/// Handle to the IO worker. Commands go in over a channel; `ClientEvent`s
/// come back out. The worker owns its own Tokio runtime so callers stay
/// synchronous.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl ClientHandle {
    pub fn new(settings: RequestSettings, artifacts_dir: PathBuf) -> Result<Self, RequestError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let backend = Arc::new(HttpBackend::new(settings)?);
        let store = Arc::new(ArtifactStore::new(artifacts_dir));

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            while let Ok(command) = cmd_rx.recv() {
                let backend = backend.clone();
                let store = store.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    handle_command(backend.as_ref(), store.as_ref(), command, event_tx).await;
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, seq: RequestSeq, base_url: impl Into<String>, spec: RequestSpec) {
        let _ = self.cmd_tx.send(ClientCommand::Submit {
            seq,
            base_url: base_url.into(),
            spec,
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    backend: &dyn Backend,
    store: &ArtifactStore,
    command: ClientCommand,
    event_tx: mpsc::Sender<ClientEvent>,
) {
    match command {
        ClientCommand::Submit {
            seq,
            base_url,
            spec,
        } => {
            client_info!("Submit seq={} base_url={}", seq, base_url);
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = run_request(backend, store, seq, &base_url, spec, &sink).await;
            if let Err(err) = &result {
                client_warn!("Request {} failed: {}", seq, err);
            }
            let _ = event_tx.send(ClientEvent::RequestCompleted { seq, result });
        }
    }
}

async fn run_request(
    backend: &dyn Backend,
    store: &ArtifactStore,
    seq: RequestSeq,
    base_url: &str,
    spec: RequestSpec,
    sink: &dyn ProgressSink,
) -> Result<RequestOutcome, RequestError> {
    match spec {
        RequestSpec::CompileGui {
            source_path,
            source_name,
            artifact_name,
        } => {
            let source = read_upload(&source_path).await?;
            let body = backend
                .compile_gui(seq, base_url, &source_name, source, sink)
                .await?;
            sink.emit(saving(seq));
            let artifact = store.save(&artifact_name, &body)?;
            Ok(RequestOutcome::Compiled { artifact })
        }
        RequestSpec::Health => {
            let (http_status, service_status) = backend.health(base_url).await?;
            Ok(RequestOutcome::Healthy {
                http_status,
                service_status,
            })
        }
        RequestSpec::FetchSite {
            site_url,
            artifact_name,
        } => {
            let body = backend.fetch_site(seq, base_url, &site_url, sink).await?;
            sink.emit(saving(seq));
            let artifact = store.save(&artifact_name, &body)?;
            Ok(RequestOutcome::SiteFetched { artifact })
        }
        RequestSpec::AnalyzeSite { site_url } => {
            let value = backend.analyze_site(base_url, &site_url).await?;
            let report = serde_json::to_string_pretty(&value)
                .map_err(|err| RequestError::MalformedResponse(err.to_string()))?;
            Ok(RequestOutcome::SiteAnalyzed { report })
        }
        RequestSpec::ImageToGui {
            image_path,
            image_name,
            use_ocr,
            html_artifact_name,
            gui_artifact_name,
        } => {
            let image = read_upload(&image_path).await?;
            let generated = backend
                .image_to_gui(base_url, &image_name, image, use_ocr)
                .await?;
            sink.emit(saving(seq));
            let html = store.save(&html_artifact_name, generated.html.as_bytes())?;
            let gui = store.save(&gui_artifact_name, generated.gui.as_bytes())?;
            Ok(RequestOutcome::ImageGenerated {
                html,
                gui,
                ocr_used: generated.ocr_used,
            })
        }
    }
}

async fn read_upload(path: &Path) -> Result<Vec<u8>, RequestError> {
    tokio::fs::read(path)
        .await
        .map_err(|err| RequestError::FileRead {
            path: path.display().to_string(),
            message: err.to_string(),
        })
}

fn saving(seq: RequestSeq) -> ClientEvent {
    ClientEvent::Progress(RequestProgress {
        seq,
        stage: Stage::Saving,
        bytes: None,
    })
}
