use crate::canvas_display::interface::CanvasDisplay;
use crate::library::logger::interface::Logger;
use crate::viewer::core::Canvas;
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayedFrame {
    pub pass: u64,
    pub canvases: Vec<Canvas>,
    pub status: String,
    pub notice: Option<String>,
}

pub struct CanvasDisplayFake {
    logger: Arc<dyn Logger + Send + Sync>,
    frame: Arc<Mutex<DisplayedFrame>>,
}

impl CanvasDisplayFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            logger: logger.with_namespace("canvas_display").with_namespace("fake"),
            frame: Arc::new(Mutex::new(DisplayedFrame::default())),
        }
    }

    #[allow(dead_code)]
    pub fn frame(&self) -> DisplayedFrame {
        match self.frame.lock() {
            Ok(frame) => frame.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut DisplayedFrame),
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut frame = self
            .frame
            .lock()
            .map_err(|e| format!("display frame lock poisoned: {}", e))?;
        apply(&mut frame);
        Ok(())
    }
}

impl CanvasDisplay for CanvasDisplayFake {
    fn show_canvases(
        &mut self,
        pass: u64,
        canvases: &[Canvas],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger.info(&format!(
            "CanvasDisplayFake::show_canvases({}, {:?})",
            pass, canvases
        ))?;
        self.update(|frame| {
            frame.pass = pass;
            frame.canvases = canvases.to_vec();
        })
    }

    fn show_status(&mut self, status: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("CanvasDisplayFake::show_status({})", status))?;
        self.update(|frame| frame.status = status.to_string())
    }

    fn show_notice(&mut self, notice: Option<&str>) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.logger
            .info(&format!("CanvasDisplayFake::show_notice({:?})", notice))?;
        self.update(|frame| frame.notice = notice.map(str::to_string))
    }
}
