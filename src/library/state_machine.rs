use std::marker::PhantomData;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

/// Drives an Elm-style loop: every received event goes through `transition_fn`,
/// the new state is handed to `render_fn` and each returned effect is run on
/// its own thread by `run_effect_fn`, which reports back through the sender.
#[derive(Debug, Clone)]
pub struct StateMachine<TState, TEvent, TEffect, T, R, E>
where
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync,
    R: Fn(&TState) + Send + Sync,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync,
{
    pub init: (TState, Vec<TEffect>),
    pub transition_fn: Arc<T>,
    pub render_fn: Arc<R>,
    pub run_effect_fn: Arc<E>,
    _event: PhantomData<TEvent>,
}

impl<TState, TEvent, TEffect, T, R, E> StateMachine<TState, TEvent, TEffect, T, R, E>
where
    TState: Clone + Send + 'static,
    TEvent: Send + 'static,
    TEffect: Clone + Send + 'static,
    T: Fn(TState, TEvent) -> (TState, Vec<TEffect>) + Send + Sync + 'static,
    R: Fn(&TState) + Send + Sync + 'static,
    E: Fn(TEffect, Sender<TEvent>) + Send + Sync + 'static,
{
    pub fn new(
        init: (TState, Vec<TEffect>),
        transition_fn: T,
        render_fn: R,
        run_effect_fn: E,
    ) -> Self {
        Self {
            init,
            transition_fn: Arc::new(transition_fn),
            render_fn: Arc::new(render_fn),
            run_effect_fn: Arc::new(run_effect_fn),
            _event: PhantomData,
        }
    }

    fn spawn_effects(&self, effects: Vec<TEffect>, event_sender: &Sender<TEvent>) {
        for effect in effects {
            let effect_sender = event_sender.clone();
            let run_effect_fn = Arc::clone(&self.run_effect_fn);
            std::thread::spawn(move || {
                run_effect_fn(effect, effect_sender);
            });
        }
    }

    /// Runs until every sender is gone. The caller keeps `event_sender` alive
    /// (and hands clones of it to the UI), so in practice this blocks for the
    /// lifetime of the application.
    pub fn run(
        &self,
        event_sender: Sender<TEvent>,
        event_receiver: Receiver<TEvent>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let (mut state, effects) = self.init.clone();

        (self.render_fn)(&state);
        self.spawn_effects(effects, &event_sender);

        loop {
            match event_receiver.recv() {
                Ok(event) => {
                    let (new_state, new_effects) = (self.transition_fn)(state, event);
                    (self.render_fn)(&new_state);
                    state = new_state;

                    self.spawn_effects(new_effects, &event_sender);
                }
                Err(e) => {
                    return Err(Box::new(e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;
    use std::time::Duration;

    #[derive(Debug)]
    enum CounterEvent {
        Add(u32),
        Doubled(u32),
    }

    #[derive(Debug, Clone, PartialEq)]
    enum CounterEffect {
        Double(u32),
    }

    #[test]
    fn test_runs_effects_and_renders_every_state() {
        let (rendered_sender, rendered_receiver) = channel();

        let machine = StateMachine::new(
            (0u32, vec![]),
            |state: u32, event: CounterEvent| match event {
                CounterEvent::Add(n) => (state + n, vec![CounterEffect::Double(n)]),
                CounterEvent::Doubled(n) => (state + n, vec![]),
            },
            move |state: &u32| {
                let _ = rendered_sender.send(*state);
            },
            |effect: CounterEffect, sender: Sender<CounterEvent>| match effect {
                CounterEffect::Double(n) => {
                    let _ = sender.send(CounterEvent::Doubled(n * 2));
                }
            },
        );

        let (event_sender, event_receiver) = channel();
        let machine_sender = event_sender.clone();
        std::thread::spawn(move || machine.run(machine_sender, event_receiver));

        event_sender.send(CounterEvent::Add(3)).unwrap();

        let timeout = Duration::from_secs(5);
        assert_eq!(rendered_receiver.recv_timeout(timeout).unwrap(), 0);
        assert_eq!(rendered_receiver.recv_timeout(timeout).unwrap(), 3);
        assert_eq!(rendered_receiver.recv_timeout(timeout).unwrap(), 9);
    }
}
