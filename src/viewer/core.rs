use crate::inference_client::interface::{
    Detection, InferenceError, InferenceMetrics, InferenceResponse,
};
use crate::selected_file::SelectedFile;
use image::RgbaImage;
use std::fmt;
use std::sync::Arc;

pub const EMPTY_SELECTION_MESSAGE: &str = "Please select one or more images first.";

/// The current file set. Only ever replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub id: u64,
    pub files: Vec<SelectedFile>,
}

impl Selection {
    pub fn replace(&mut self, files: Vec<SelectedFile>) {
        self.id += 1;
        self.files = files;
    }

    pub fn find(&self, filename: &str) -> Option<&SelectedFile> {
        self.files.iter().find(|file| file.name == filename)
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// One drawing surface. `image` stays `None` until its paint completes, and
/// forever if the file cannot be decoded.
#[derive(Clone, PartialEq)]
pub struct Canvas {
    pub filename: String,
    pub image: Option<Arc<RgbaImage>>,
}

impl Canvas {
    pub fn blank(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            image: None,
        }
    }
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("filename", &self.filename)
            .field("image", &self.image.as_ref().map(|image| image.dimensions()))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    OriginalsShown,
    Annotated,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Submission {
    #[default]
    Idle,
    InFlight {
        request_id: u64,
        selection_id: u64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    EmptySelection,
    InferenceFailed { detail: String },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::EmptySelection => EMPTY_SELECTION_MESSAGE.to_string(),
            Notice::InferenceFailed { detail } => format!("Error: {}", detail),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    pub selection: Selection,
    pub phase: Phase,
    /// Bumped on every clear-and-rebuild of `canvases`.
    pub pass: u64,
    pub canvases: Vec<Canvas>,
    pub submission: Submission,
    pub next_request_id: u64,
    pub notice: Option<Notice>,
    pub metrics: Option<InferenceMetrics>,
}

impl State {
    pub fn painted_count(&self) -> usize {
        self.canvases.iter().filter(|c| c.image.is_some()).count()
    }

    fn rebuild_canvases<'a>(
        &mut self,
        items: impl IntoIterator<Item = (&'a SelectedFile, Vec<Detection>)>,
    ) -> Vec<Effect> {
        self.pass += 1;
        self.canvases.clear();

        let mut effects = Vec::new();
        for (index, (file, detections)) in items.into_iter().enumerate() {
            self.canvases.push(Canvas::blank(&file.name));
            effects.push(Effect::PaintCanvas {
                pass: self.pass,
                index,
                file: file.clone(),
                detections,
            });
        }
        effects
    }
}

#[derive(Debug)]
pub enum Event {
    FilesSelected(Vec<SelectedFile>),
    CanvasPainted {
        pass: u64,
        index: usize,
        painted: Result<RgbaImage, Box<dyn std::error::Error + Send + Sync>>,
    },
    SubmitRequested,
    InferenceDone {
        request_id: u64,
        response: Result<InferenceResponse, InferenceError>,
    },
    NoticeDismissed,
}

impl Event {
    pub fn to_display_string(&self) -> String {
        match self {
            Event::FilesSelected(files) => format!(
                "FilesSelected({:?})",
                files.iter().map(|f| f.name.as_str()).collect::<Vec<_>>()
            ),
            Event::CanvasPainted {
                pass,
                index,
                painted,
            } => format!(
                "CanvasPainted {{ pass: {}, index: {}, painted: {} }}",
                pass,
                index,
                match painted {
                    Ok(image) => format!("Ok({}x{})", image.width(), image.height()),
                    Err(e) => format!("Err({})", e),
                }
            ),
            Event::InferenceDone {
                request_id,
                response,
            } => format!(
                "InferenceDone {{ request_id: {}, response: {} }}",
                request_id,
                match response {
                    Ok(response) => format!("Ok({} result(s))", response.results.len()),
                    Err(e) => format!("Err({})", e),
                }
            ),
            event => format!("{:?}", event),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Decode `file` and draw `detections` on it. Originals are painted with
    /// no detections.
    PaintCanvas {
        pass: u64,
        index: usize,
        file: SelectedFile,
        detections: Vec<Detection>,
    },
    SubmitBatch {
        request_id: u64,
        files: Vec<SelectedFile>,
    },
}

impl Effect {
    pub fn to_display_string(&self) -> String {
        match self {
            Effect::PaintCanvas {
                pass,
                index,
                file,
                detections,
            } => format!(
                "PaintCanvas {{ pass: {}, index: {}, file: {}, detections: {} }}",
                pass,
                index,
                file.name,
                detections.len()
            ),
            Effect::SubmitBatch { request_id, files } => format!(
                "SubmitBatch {{ request_id: {}, files: {} }}",
                request_id,
                files.len()
            ),
        }
    }
}

pub fn init() -> (State, Vec<Effect>) {
    (State::default(), vec![])
}

pub fn transition(state: State, event: Event) -> (State, Vec<Effect>) {
    let mut state = state;

    match event {
        Event::FilesSelected(files) => {
            state.selection.replace(files);
            state.phase = Phase::OriginalsShown;
            // An outstanding request now describes files that are gone; its
            // response is dropped by request id.
            state.submission = Submission::Idle;
            state.metrics = None;

            let files = state.selection.files.clone();
            let effects = state.rebuild_canvases(files.iter().map(|file| (file, vec![])));
            (state, effects)
        }

        Event::CanvasPainted {
            pass,
            index,
            painted,
        } => {
            if pass != state.pass {
                return (state, vec![]);
            }
            if let (Some(canvas), Ok(image)) = (state.canvases.get_mut(index), painted) {
                canvas.image = Some(Arc::new(image));
            }
            (state, vec![])
        }

        Event::SubmitRequested => {
            if state.notice.is_some() {
                return (state, vec![]);
            }
            if state.selection.is_empty() {
                state.notice = Some(Notice::EmptySelection);
                return (state, vec![]);
            }
            if matches!(state.submission, Submission::InFlight { .. }) {
                return (state, vec![]);
            }

            let request_id = state.next_request_id;
            state.next_request_id += 1;
            state.submission = Submission::InFlight {
                request_id,
                selection_id: state.selection.id,
            };

            let files = state.selection.files.clone();
            (state, vec![Effect::SubmitBatch { request_id, files }])
        }

        Event::InferenceDone {
            request_id,
            response,
        } => {
            let selection_id = match state.submission {
                Submission::InFlight {
                    request_id: in_flight,
                    selection_id,
                } if in_flight == request_id => selection_id,
                _ => return (state, vec![]),
            };
            state.submission = Submission::Idle;

            // The user picked other files while waiting; these results
            // describe images that are no longer shown.
            if selection_id != state.selection.id {
                return (state, vec![]);
            }

            match response {
                Ok(response) => {
                    let selection = state.selection.clone();
                    let matched = response.results.into_iter().filter_map(|item| {
                        selection
                            .find(&item.filename)
                            .map(|file| (file, item.inference))
                    });
                    let effects = state.rebuild_canvases(matched);
                    state.phase = Phase::Annotated;
                    state.metrics = response.metrics;
                    (state, effects)
                }
                Err(e) => {
                    state.notice = Some(Notice::InferenceFailed { detail: e.detail() });
                    (state, vec![])
                }
            }
        }

        Event::NoticeDismissed => {
            state.notice = None;
            (state, vec![])
        }
    }
}
