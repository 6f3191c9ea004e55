use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyEvent};

use crate::controller::{Completion, CompletionSink};

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Tick,
    Fetched(Completion),
}

/// Single queue the UI loop drains: key presses and ticks from the input
/// thread, finished fetch cycles from the runtime.
pub struct EventQueue {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl EventQueue {
    pub fn start(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();
        thread::spawn(move || read_terminal(input_tx, tick_rate));
        Self { tx, rx }
    }

    /// Sink for the controller; each completion becomes an [`Event::Fetched`].
    pub fn completion_sink(&self) -> CompletionSink {
        let tx = self.tx.clone();
        Arc::new(move |completion| {
            let _ = tx.send(Event::Fetched(completion));
        })
    }

    pub fn next(&self) -> Result<Event, RecvError> {
        self.rx.recv()
    }
}

/// Runs until the queue is gone or the terminal stops answering.
fn read_terminal(tx: Sender<Event>, tick_rate: Duration) {
    let mut last_tick = Instant::now();
    loop {
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if event::poll(timeout).unwrap_or(false) {
            match event::read() {
                Ok(TermEvent::Key(key)) => {
                    if tx.send(Event::Key(key)).is_err() {
                        return;
                    }
                }
                Ok(_) => {}
                Err(_) => return,
            }
        }

        if last_tick.elapsed() >= tick_rate {
            if tx.send(Event::Tick).is_err() {
                return;
            }
            last_tick = Instant::now();
        }
    }
}
