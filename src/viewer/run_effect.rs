use crate::inference_client::interface::InferenceClient;
use crate::library::logger::interface::Logger;
use crate::overlay::CanvasPainter;
use crate::viewer::core::{Effect, Event};
use std::sync::mpsc::Sender;
use std::sync::Arc;

#[derive(Clone)]
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    inference_client: Arc<dyn InferenceClient + Send + Sync>,
    canvas_painter: Arc<CanvasPainter>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        inference_client: Arc<dyn InferenceClient + Send + Sync>,
        canvas_painter: Arc<CanvasPainter>,
    ) -> Self {
        Self {
            logger: logger.with_namespace("run_effect"),
            inference_client,
            canvas_painter,
        }
    }

    pub fn run_effect(&self, effect: Effect, event_sender: Sender<Event>) {
        let _ = self
            .logger
            .info(&format!("Running effect: {}", effect.to_display_string()));

        match effect {
            Effect::PaintCanvas {
                pass,
                index,
                file,
                detections,
            } => {
                let painted = self.canvas_painter.paint(&file, &detections);
                if let Err(e) = &painted {
                    let _ = self
                        .logger
                        .warn(&format!("Could not draw {}: {}", file.name, e));
                }
                let _ = event_sender.send(Event::CanvasPainted {
                    pass,
                    index,
                    painted,
                });
            }
            Effect::SubmitBatch { request_id, files } => {
                let response = self.inference_client.infer(&files);
                if let Err(e) = &response {
                    let _ = self
                        .logger
                        .warn(&format!("Inference request {} failed: {}", request_id, e));
                }
                let _ = event_sender.send(Event::InferenceDone {
                    request_id,
                    response,
                });
            }
        }
    }
}
