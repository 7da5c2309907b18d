use crate::selected_file::SelectedFile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// `[x1, y1, x2, y2]` in image pixel coordinates.
    pub bbox: [f32; 4],
    pub class_id: u32,
    pub confidence: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub filename: String,
    pub inference: Vec<Detection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceMetrics {
    pub num_images: usize,
    pub inference_time_sec: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub results: Vec<InferenceResult>,
    #[serde(default)]
    pub metrics: Option<InferenceMetrics>,
}

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}

impl InferenceError {
    /// Text shown to the user after `Error: `.
    pub fn detail(&self) -> String {
        match self {
            InferenceError::Rejected { detail, .. } => detail.clone(),
            other => other.to_string(),
        }
    }
}

pub trait InferenceClient {
    /// Sends every file in one request and waits for the whole batch.
    fn infer(&self, files: &[SelectedFile]) -> Result<InferenceResponse, InferenceError>;
}
