use crate::canvas_display::impl_fake::{CanvasDisplayFake, DisplayedFrame};
use crate::config::Config;
use crate::inference_client::impl_fake::{FakeBehavior, InferenceClientFake};
use crate::inference_client::interface::{Detection, InferenceResponse, InferenceResult};
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::overlay::CanvasPainter;
use crate::viewer::run::BatchViewer;
use crate::viewer::run_effect::RunEffect;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: Arc<dyn Logger + Send + Sync>,
    pub inference_client: Arc<InferenceClientFake>,
    pub display: Arc<Mutex<CanvasDisplayFake>>,
    pub canvas_painter: Arc<CanvasPainter>,
}

impl Fixture {
    pub fn new(behavior: FakeBehavior) -> Self {
        let config = Config::default();
        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let inference_client = Arc::new(InferenceClientFake::with_behavior(
            logger.clone(),
            behavior,
        ));
        let display = Arc::new(Mutex::new(CanvasDisplayFake::new(logger.clone())));
        let canvas_painter = Arc::new(CanvasPainter::new(config.overlay.clone()).unwrap());

        Self {
            config,
            logger,
            inference_client,
            display,
            canvas_painter,
        }
    }

    pub fn run_effect(&self) -> RunEffect {
        RunEffect::new(
            self.logger.clone(),
            self.inference_client.clone(),
            self.canvas_painter.clone(),
        )
    }

    pub fn viewer(&self) -> BatchViewer {
        BatchViewer::new(
            self.logger.clone(),
            self.inference_client.clone(),
            self.canvas_painter.clone(),
            self.display.clone(),
        )
    }

    pub fn frame(&self) -> DisplayedFrame {
        self.display.lock().unwrap().frame()
    }

    /// Polls the fake display until `done` holds or five seconds pass.
    pub fn wait_for(&self, done: impl Fn(&DisplayedFrame) -> bool) -> DisplayedFrame {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let frame = self.frame();
            if done(&frame) {
                return frame;
            }
            if Instant::now() > deadline {
                panic!("Timed out waiting for display, last frame: {:?}", frame);
            }
            std::thread::sleep(Duration::from_millis(10));
        }
    }
}

pub fn detection(bbox: [f32; 4], class_id: u32, confidence: f32) -> Detection {
    Detection {
        bbox,
        class_id,
        confidence,
    }
}

pub fn response(results: Vec<(&str, Vec<Detection>)>) -> InferenceResponse {
    InferenceResponse {
        results: results
            .into_iter()
            .map(|(filename, inference)| InferenceResult {
                filename: filename.to_string(),
                inference,
            })
            .collect(),
        metrics: None,
    }
}
