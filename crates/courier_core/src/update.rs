use crate::{
    compiled_artifact_name, image_artifact_names, site_artifact_name, ActionKind, ActionOutcome,
    AppState, BackendRequest, Effect, Msg, RequestFailure, StatusTone, ENTER_URL_PROMPT,
    SELECT_FILE_PROMPT, SELECT_IMAGE_PROMPT,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::BaseUrlResolved(value) => {
            state.set_base_url(value);
            Vec::new()
        }
        Msg::BaseUrlEdited(value) => {
            state.set_base_url(value.clone());
            vec![Effect::PersistBaseUrl { value }]
        }
        Msg::CompileRequested { file: None } => {
            state.set_status(SELECT_FILE_PROMPT, StatusTone::Neutral);
            Vec::new()
        }
        Msg::CompileRequested { file: Some(file) } => {
            let artifact_name = compiled_artifact_name(&file.name);
            let base_url = state.effective_base_url();
            state.clear_results();
            let seq =
                state.begin_request(ActionKind::CompileGui, "Uploading and generating HTML...");
            vec![Effect::SendRequest {
                seq,
                base_url,
                request: BackendRequest::CompileGui {
                    source_path: file.path,
                    source_name: file.name,
                    artifact_name,
                },
            }]
        }
        Msg::HealthRequested => {
            let base_url = state.effective_base_url();
            let seq = state.begin_request(ActionKind::Health, "Checking backend connection...");
            vec![Effect::SendRequest {
                seq,
                base_url,
                request: BackendRequest::Health,
            }]
        }
        Msg::FetchSiteRequested { url } => {
            let site_url = url.trim().to_string();
            if site_url.is_empty() {
                state.set_status(ENTER_URL_PROMPT, StatusTone::Neutral);
                return (state, Vec::new());
            }
            let artifact_name = site_artifact_name(&site_url);
            let base_url = state.effective_base_url();
            state.clear_results();
            let seq = state.begin_request(ActionKind::FetchSite, "Fetching site HTML...");
            vec![Effect::SendRequest {
                seq,
                base_url,
                request: BackendRequest::FetchSite {
                    site_url,
                    artifact_name,
                },
            }]
        }
        Msg::AnalyzeRequested { url } => {
            let site_url = url.trim().to_string();
            if site_url.is_empty() {
                state.set_status(ENTER_URL_PROMPT, StatusTone::Neutral);
                return (state, Vec::new());
            }
            let base_url = state.effective_base_url();
            state.clear_results();
            let seq = state.begin_request(ActionKind::AnalyzeSite, "Analyzing site...");
            vec![Effect::SendRequest {
                seq,
                base_url,
                request: BackendRequest::AnalyzeSite { site_url },
            }]
        }
        Msg::ImageRequested { file: None, .. } => {
            state.set_status(SELECT_IMAGE_PROMPT, StatusTone::Neutral);
            Vec::new()
        }
        Msg::ImageRequested {
            file: Some(file),
            use_ocr,
        } => {
            let (html_artifact_name, gui_artifact_name) = image_artifact_names(&file.name);
            let base_url = state.effective_base_url();
            state.clear_results();
            let seq = state.begin_request(
                ActionKind::ImageToGui,
                "Uploading image and generating GUI...",
            );
            vec![Effect::SendRequest {
                seq,
                base_url,
                request: BackendRequest::ImageToGui {
                    image_path: file.path,
                    image_name: file.name,
                    use_ocr,
                    html_artifact_name,
                    gui_artifact_name,
                },
            }]
        }
        Msg::RequestProgress { seq, stage } => {
            state.set_stage(seq, stage);
            Vec::new()
        }
        Msg::RequestCompleted { seq, outcome } => {
            // Completions carrying a superseded token are dropped so a slow
            // earlier request can never overwrite a newer one's results.
            let Some(kind) = state.pending_kind_for(seq) else {
                return (state, Vec::new());
            };
            state.clear_pending();
            apply_outcome(&mut state, kind, outcome);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn apply_outcome(
    state: &mut AppState,
    kind: ActionKind,
    outcome: Result<ActionOutcome, RequestFailure>,
) {
    match outcome {
        Ok(ActionOutcome::Compiled { artifact }) => {
            state.set_artifacts(vec![artifact]);
            state.set_status("HTML generated successfully.", StatusTone::Ok);
        }
        Ok(ActionOutcome::Healthy {
            http_status,
            service_status,
        }) => {
            let text = match service_status {
                Some(service) => format!("OK: {http_status} ({service})"),
                None => format!("OK: {http_status}"),
            };
            state.set_status(text, StatusTone::Ok);
        }
        Ok(ActionOutcome::SiteFetched { artifact }) => {
            state.set_artifacts(vec![artifact]);
            state.set_status("Site HTML loaded successfully.", StatusTone::Ok);
        }
        Ok(ActionOutcome::SiteAnalyzed { report }) => {
            state.set_analysis(report);
            state.set_status("Site analysis complete.", StatusTone::Ok);
        }
        Ok(ActionOutcome::ImageGenerated {
            html,
            gui,
            ocr_used,
        }) => {
            state.set_artifacts(vec![html, gui]);
            let text = if ocr_used {
                "GUI generated from image (OCR used)."
            } else {
                "GUI generated from image (OCR not used)."
            };
            state.set_status(text, StatusTone::Ok);
        }
        Err(failure) => {
            state.set_status(
                format!("{}{}", failure_prefix(kind), failure.message),
                StatusTone::Error,
            );
        }
    }
}

fn failure_prefix(kind: ActionKind) -> &'static str {
    match kind {
        ActionKind::CompileGui => "Compile failed: ",
        ActionKind::Health => "Connection failed: ",
        ActionKind::FetchSite => "Site fetch failed: ",
        ActionKind::AnalyzeSite => "Analysis failed: ",
        ActionKind::ImageToGui => "Image generation failed: ",
    }
}
