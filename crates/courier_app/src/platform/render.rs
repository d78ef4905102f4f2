use courier_core::{AppViewModel, StatusTone};

/// Terminal rendering of the view model. Progress ticks mark the view dirty
/// without changing the status line, so the renderer diffs against what it
/// last printed.
#[derive(Default)]
pub(crate) struct Renderer {
    last_status: Option<(String, StatusTone)>,
}

impl Renderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn render(&mut self, view: &AppViewModel) {
        if view.status_text.is_empty() {
            return;
        }
        let status = (view.status_text.clone(), view.status_tone);
        if self.last_status.as_ref() == Some(&status) {
            return;
        }

        match view.status_tone {
            StatusTone::Error => eprintln!("error: {}", view.status_text),
            StatusTone::Ok | StatusTone::Neutral => println!("{}", view.status_text),
        }
        for artifact in &view.artifacts {
            println!("  saved {} ({} bytes)", artifact.path, artifact.bytes);
        }
        if let Some(analysis) = &view.analysis {
            println!("{analysis}");
        }

        self.last_status = Some(status);
    }
}
