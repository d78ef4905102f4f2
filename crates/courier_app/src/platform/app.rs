use std::collections::VecDeque;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use client_logging::client_error;
use courier_core::{
    resolve_base_url, update, AppState, Msg, SelectedFile, StatusTone, DEFAULT_BACKEND_URL,
};
use courier_client::{ClientHandle, RequestSettings};

use super::effects::EffectRunner;
use super::render::Renderer;
use super::{logging, persistence};
use crate::{Cli, Commands};

pub(crate) fn run_app(cli: Cli) -> ExitCode {
    logging::initialize(cli.log.into(), cli.verbose);

    let stored = persistence::load_backend_url(&cli.artifacts_dir);
    let resolved = resolve_base_url(cli.api.as_deref(), stored.as_deref(), DEFAULT_BACKEND_URL);

    let handle = match ClientHandle::new(RequestSettings::default(), cli.artifacts_dir.clone()) {
        Ok(handle) => handle,
        Err(err) => {
            client_error!("Failed to start IO worker: {}", err);
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };
    let runner = EffectRunner::new(handle, cli.artifacts_dir.clone());
    let mut renderer = Renderer::new();

    // An explicit --api counts as a user edit and is persisted; otherwise
    // the resolved value is only seeded into the input.
    let seed = if cli.api.is_some() {
        Msg::BaseUrlEdited(resolved)
    } else {
        Msg::BaseUrlResolved(resolved)
    };

    let mut state = AppState::new();
    let mut queue = VecDeque::from([seed, action_msg(&cli.command)]);

    loop {
        while let Some(msg) = queue.pop_front() {
            let (next, effects) = update(std::mem::take(&mut state), msg);
            state = next;
            runner.run(effects);
            if state.consume_dirty() {
                renderer.render(&state.view());
            }
        }

        if !state.view().busy {
            break;
        }
        if let Some(msg) = runner.poll(Duration::from_millis(50)) {
            queue.push_back(msg);
        }
    }

    if state.view().status_tone == StatusTone::Error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn action_msg(command: &Commands) -> Msg {
    match command {
        Commands::Compile { file } => Msg::CompileRequested {
            file: file.as_deref().map(selected),
        },
        Commands::Health => Msg::HealthRequested,
        Commands::FetchSite { url } => Msg::FetchSiteRequested { url: url.clone() },
        Commands::Analyze { url } => Msg::AnalyzeRequested { url: url.clone() },
        Commands::Image { file, ocr } => Msg::ImageRequested {
            file: file.as_deref().map(selected),
            use_ocr: *ocr,
        },
    }
}

fn selected(path: &Path) -> SelectedFile {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    SelectedFile {
        name,
        path: path.display().to_string(),
    }
}
