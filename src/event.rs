use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, KeyEvent, KeyEventKind};
use log::debug;

use crate::error::DeltaError;

pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Next frame is due.
    Tick,
}

/// Frame scheduler and input pump. One event is handled at a time, so frame
/// callbacks never overlap.
pub struct EventHandler {
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let tick_rate = Duration::from_millis(tick_rate_ms);

        thread::spawn(move || loop {
            let sent = if event::poll(tick_rate).unwrap_or(false) {
                match event::read() {
                    Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        tx.send(Event::Key(key))
                    }
                    Ok(event::Event::Resize(w, h)) => tx.send(Event::Resize(w, h)),
                    _ => Ok(()),
                }
            } else {
                tx.send(Event::Tick)
            };
            if sent.is_err() {
                debug!("Event channel closed, stopping event thread");
                return;
            }
        });

        Self { rx }
    }

    pub fn next(&self) -> Result<Event, DeltaError> {
        self.rx
            .recv()
            .map_err(|e| DeltaError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))
    }
}
