use canvas_display::impl_gui::CanvasDisplayGui;
use clap::Parser;
use config::{Args, Config};
use inference_client::impl_fake::InferenceClientFake;
use inference_client::impl_http::InferenceClientHttp;
use inference_client::interface::InferenceClient;
use library::logger::impl_console::LoggerConsole;
use library::logger::impl_file::LoggerFile;
use library::logger::impl_multi::LoggerMulti;
use library::logger::interface::Logger;
use overlay::CanvasPainter;
use selected_file::SelectedFile;
use std::sync::mpsc::channel;
use std::sync::{Arc, Mutex};
use viewer::core::Event;
use viewer::run::BatchViewer;

mod canvas_display;
mod config;
mod inference_client;
mod library;
mod overlay;
mod selected_file;
mod viewer;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::from_args(Args::parse());

    let logger: Arc<dyn Logger + Send + Sync> = Arc::new(LoggerMulti::new(vec![
        Arc::new(LoggerConsole::new(config.logger_timezone)),
        Arc::new(LoggerFile::new(
            config.log_file.clone(),
            config.log_max_bytes,
            config.log_backups,
            config.logger_timezone,
        )),
    ]));
    let _ = logger.info("Starting batch annotation viewer");

    let inference_client: Arc<dyn InferenceClient + Send + Sync> = if config.offline {
        let _ = logger.info("Offline mode: detections are random");
        Arc::new(InferenceClientFake::new(logger.clone()))
    } else {
        let _ = logger.info(&format!("Inference endpoint: {}", config.endpoint));
        Arc::new(InferenceClientHttp::new(&config, logger.clone())?)
    };

    let canvas_painter = Arc::new(CanvasPainter::new(config.overlay.clone())?);

    let display = CanvasDisplayGui::new();
    let (event_sender, event_receiver) = channel();
    let window = display.window(event_sender.clone(), logger.clone());

    let viewer = BatchViewer::new(
        logger.clone(),
        inference_client,
        canvas_painter,
        Arc::new(Mutex::new(display)),
    );
    let viewer_sender = event_sender.clone();
    let viewer_logger = logger.clone();
    std::thread::spawn(move || {
        if let Err(e) = viewer.run(viewer_sender, event_receiver) {
            let _ = viewer_logger.warn(&format!("Viewer stopped: {}", e));
        }
    });

    if !config.initial_images.is_empty() {
        let mut files = Vec::new();
        for path in &config.initial_images {
            match SelectedFile::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    let _ = logger.warn(&format!("Could not read {}: {}", path.display(), e));
                }
            }
        }
        event_sender
            .send(Event::FilesSelected(files))
            .map_err(|e| format!("viewer is not running: {}", e))?;
    }

    window.run("Batch Annotation Viewer", config.window_size)?;

    let _ = logger.info("Window closed");
    Ok(())
}
