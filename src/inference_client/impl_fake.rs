use crate::inference_client::interface::{
    Detection, InferenceClient, InferenceError, InferenceMetrics, InferenceResponse,
    InferenceResult,
};
use crate::library::logger::interface::Logger;
use crate::selected_file::SelectedFile;
use rand::distr::{Distribution, Uniform};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum FakeBehavior {
    /// A few random boxes per decodable file.
    Random,
    Respond(InferenceResponse),
    Reject { status: u16, detail: String },
}

pub struct InferenceClientFake {
    logger: Arc<dyn Logger + Send + Sync>,
    behavior: FakeBehavior,
    calls: AtomicUsize,
}

impl InferenceClientFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self::with_behavior(logger, FakeBehavior::Random)
    }

    pub fn with_behavior(logger: Arc<dyn Logger + Send + Sync>, behavior: FakeBehavior) -> Self {
        Self {
            logger: logger.with_namespace("inference_client").with_namespace("fake"),
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn random_detections(
        file: &SelectedFile,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error + Send + Sync>> {
        let (width, height) = file.decode()?.dimensions();
        if width < 2 || height < 2 {
            return Ok(vec![]);
        }

        let mut rng = rand::rng();
        let count_dist = Uniform::new_inclusive(0, 4)?;
        let class_dist = Uniform::new_inclusive(0u32, 5)?;
        let confidence_dist = Uniform::new(0.25f32, 1.0)?;
        let x_dist = Uniform::new(0.0f32, width as f32 - 1.0)?;
        let y_dist = Uniform::new(0.0f32, height as f32 - 1.0)?;

        let detections = (0..count_dist.sample(&mut rng))
            .map(|_| {
                let (xa, xb) = (x_dist.sample(&mut rng), x_dist.sample(&mut rng));
                let (ya, yb) = (y_dist.sample(&mut rng), y_dist.sample(&mut rng));
                Detection {
                    bbox: [xa.min(xb), ya.min(yb), xa.max(xb), ya.max(yb)],
                    class_id: class_dist.sample(&mut rng),
                    confidence: confidence_dist.sample(&mut rng),
                }
            })
            .collect();

        Ok(detections)
    }

    fn random_response(&self, files: &[SelectedFile]) -> InferenceResponse {
        let started = Instant::now();
        let mut results = Vec::new();

        for file in files {
            match Self::random_detections(file) {
                Ok(inference) => results.push(InferenceResult {
                    filename: file.name.clone(),
                    inference,
                }),
                Err(e) => {
                    let _ = self
                        .logger
                        .warn(&format!("Skipping {}: {}", file.name, e));
                }
            }
        }

        InferenceResponse {
            metrics: Some(InferenceMetrics {
                num_images: results.len(),
                inference_time_sec: started.elapsed().as_secs_f64(),
            }),
            results,
        }
    }
}

impl InferenceClient for InferenceClientFake {
    fn infer(&self, files: &[SelectedFile]) -> Result<InferenceResponse, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self
            .logger
            .info(&format!("Inferring {} file(s) with fake client...", files.len()));

        match &self.behavior {
            FakeBehavior::Random => Ok(self.random_response(files)),
            FakeBehavior::Respond(response) => Ok(response.clone()),
            FakeBehavior::Reject { status, detail } => Err(InferenceError::Rejected {
                status: *status,
                detail: detail.clone(),
            }),
        }
    }
}
