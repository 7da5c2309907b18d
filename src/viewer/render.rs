use crate::canvas_display::interface::CanvasDisplay;
use crate::viewer::core::{Notice, Phase, State, Submission};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Render {
    display: Arc<Mutex<dyn CanvasDisplay + Send + Sync>>,
}

impl Render {
    pub fn new(display: Arc<Mutex<dyn CanvasDisplay + Send + Sync>>) -> Self {
        Self { display }
    }

    pub fn render(&self, state: &State) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut display = self
            .display
            .lock()
            .map_err(|e| format!("display lock poisoned: {}", e))?;

        display.show_canvases(state.pass, &state.canvases)?;
        display.show_status(&status_line(state))?;
        display.show_notice(state.notice.as_ref().map(Notice::message).as_deref())?;

        Ok(())
    }
}

pub fn status_line(state: &State) -> String {
    let selected = state.selection.files.len();

    match (&state.submission, state.phase) {
        (Submission::InFlight { .. }, _) => format!("Submitting {} image(s)...", selected),
        (Submission::Idle, Phase::Annotated) => {
            let annotated = format!("Annotated {} of {} image(s)", state.canvases.len(), selected);
            match &state.metrics {
                Some(metrics) => format!("{} in {:.2}s", annotated, metrics.inference_time_sec),
                None => annotated,
            }
        }
        (Submission::Idle, Phase::OriginalsShown) if selected == 0 => {
            "No images selected".to_string()
        }
        (Submission::Idle, Phase::OriginalsShown) => format!("{} image(s) selected", selected),
    }
}
