use crate::errors::ScreenError;
use crate::screen::{
    Screen, SCREEN_EVENT_CLOSE, SCREEN_EVENT_CREATE, SCREEN_EVENT_KEYBOARD, SCREEN_EVENT_POINTER,
};
use crate::session::ScreenSession;
use log::{debug, info, trace};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Event kinds the overlay reacts to; anything else keeps its raw tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenEventKind {
    Create,
    Close,
    Pointer { x: i32, y: i32 },
    Keyboard,
    Unknown(i32),
}

impl ScreenEventKind {
    /// Classifies a raw type tag; `position` is only kept for pointer events
    pub fn from_raw(type_tag: i32, position: [i32; 2]) -> Self {
        match type_tag {
            SCREEN_EVENT_CREATE => ScreenEventKind::Create,
            SCREEN_EVENT_CLOSE => ScreenEventKind::Close,
            SCREEN_EVENT_POINTER => ScreenEventKind::Pointer {
                x: position[0],
                y: position[1],
            },
            SCREEN_EVENT_KEYBOARD => ScreenEventKind::Keyboard,
            other => ScreenEventKind::Unknown(other),
        }
    }
}

impl fmt::Display for ScreenEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenEventKind::Create => write!(f, "SCREEN_EVENT_CREATE"),
            ScreenEventKind::Close => write!(f, "SCREEN_EVENT_CLOSE"),
            ScreenEventKind::Pointer { x, y } => write!(f, "SCREEN_EVENT_POINTER at ({}, {})", x, y),
            ScreenEventKind::Keyboard => write!(f, "SCREEN_EVENT_KEYBOARD"),
            ScreenEventKind::Unknown(tag) => write!(f, "Unknown event type {}", tag),
        }
    }
}

/// Result of one wait on the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// An event arrived and was printed under this index
    Event { index: usize, kind: ScreenEventKind },
    /// The wait timed out or failed; both are reported the same way
    NoEvent(ScreenError),
}

/// Polls for events and prints one line per wait.
///
/// The counter is shared by every event kind and only moves when an event
/// arrives.
pub struct EventLoop {
    timeout: Duration,
    event_count: usize,
}

impl EventLoop {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            event_count: 0,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Events printed so far
    pub fn event_count(&self) -> usize {
        self.event_count
    }

    /// One waiting → dispatching → waiting round
    pub fn poll_once<S: Screen>(
        &mut self,
        session: &mut ScreenSession<S>,
        out: &mut dyn Write,
    ) -> io::Result<PollOutcome> {
        match session.next_event(self.timeout) {
            Ok(kind) => {
                let index = self.event_count;
                self.event_count += 1;
                debug!("event {} classified as {:?}", index, kind);
                writeln!(out, "Event {}: {}", index, kind)?;
                Ok(PollOutcome::Event { index, kind })
            }
            Err(e) => {
                trace!("no event: {}", e);
                writeln!(out, "No events received (timeout)")?;
                Ok(PollOutcome::NoEvent(e))
            }
        }
    }

    /// Polls until `running` is cleared; returns the number of events seen
    pub fn run<S: Screen>(
        &mut self,
        session: &mut ScreenSession<S>,
        running: &AtomicBool,
        out: &mut dyn Write,
    ) -> io::Result<usize> {
        info!(
            "🔄 Waiting for events ({} ms timeout)",
            self.timeout.as_millis()
        );
        while running.load(Ordering::SeqCst) {
            self.poll_once(session, out)?;
            out.flush()?;
        }
        info!("🛑 Event loop stopped after {} event(s)", self.event_count);
        Ok(self.event_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_tags() {
        assert_eq!(
            ScreenEventKind::from_raw(SCREEN_EVENT_CREATE, [9, 9]),
            ScreenEventKind::Create
        );
        assert_eq!(
            ScreenEventKind::from_raw(SCREEN_EVENT_CLOSE, [0, 0]),
            ScreenEventKind::Close
        );
        assert_eq!(
            ScreenEventKind::from_raw(SCREEN_EVENT_POINTER, [50, 75]),
            ScreenEventKind::Pointer { x: 50, y: 75 }
        );
        assert_eq!(
            ScreenEventKind::from_raw(SCREEN_EVENT_KEYBOARD, [0, 0]),
            ScreenEventKind::Keyboard
        );
        assert_eq!(
            ScreenEventKind::from_raw(42, [0, 0]),
            ScreenEventKind::Unknown(42)
        );
    }

    #[test]
    fn test_event_lines() {
        assert_eq!(
            ScreenEventKind::Pointer { x: 50, y: 75 }.to_string(),
            "SCREEN_EVENT_POINTER at (50, 75)"
        );
        assert_eq!(
            ScreenEventKind::Unknown(2).to_string(),
            "Unknown event type 2"
        );
    }
}
