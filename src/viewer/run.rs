use crate::canvas_display::interface::CanvasDisplay;
use crate::inference_client::interface::InferenceClient;
use crate::library::logger::interface::Logger;
use crate::library::state_machine::StateMachine;
use crate::overlay::CanvasPainter;
use crate::viewer::core::{init, transition, Effect, Event, State};
use crate::viewer::render::Render;
use crate::viewer::run_effect::RunEffect;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct BatchViewer {
    logger: Arc<dyn Logger + Send + Sync>,
    run_effect: RunEffect,
    render: Render,
}

impl BatchViewer {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        inference_client: Arc<dyn InferenceClient + Send + Sync>,
        canvas_painter: Arc<CanvasPainter>,
        display: Arc<Mutex<dyn CanvasDisplay + Send + Sync>>,
    ) -> Self {
        let logger = logger.with_namespace("viewer");
        Self {
            run_effect: RunEffect::new(logger.clone(), inference_client, canvas_painter),
            render: Render::new(display),
            logger,
        }
    }

    /// Processes events until the application exits.
    pub fn run(
        &self,
        event_sender: Sender<Event>,
        event_receiver: Receiver<Event>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let transition_logger = self.logger.clone();
        let render_logger = self.logger.clone();
        let render = self.render.clone();
        let run_effect = self.run_effect.clone();

        let machine = StateMachine::new(
            init(),
            move |state: State, event: Event| {
                let _ = transition_logger.info(&format!("Event: {}", event.to_display_string()));
                let (new_state, effects) = transition(state, event);
                let _ = transition_logger.info(&format!(
                    "Phase: {:?}, pass: {}, canvases: {} ({} painted), effects: {:?}",
                    new_state.phase,
                    new_state.pass,
                    new_state.canvases.len(),
                    new_state.painted_count(),
                    effects
                        .iter()
                        .map(Effect::to_display_string)
                        .collect::<Vec<_>>()
                ));
                (new_state, effects)
            },
            move |state: &State| {
                if let Err(e) = render.render(state) {
                    let _ = render_logger.warn(&format!("Render failed: {}", e));
                }
            },
            move |effect: Effect, sender: Sender<Event>| run_effect.run_effect(effect, sender),
        );

        machine.run(event_sender, event_receiver)
    }
}
