//! Composes an opaque, touch-sensitive background window with a
//! semi-transparent, touch-transparent overlay through a compositor service,
//! then prints the events the service delivers until asked to stop.

pub mod config;
pub mod display;
pub mod errors;
pub mod screen;
pub mod session;
pub mod window;
pub mod window_events;

pub use config::{parse_display_id, OverlayConfig, WindowConfig};
pub use display::DisplayInfo;
pub use errors::{OverlayError, OverlayResult, ScreenError, ScreenResult, WindowRole};
pub use screen::{HeadlessScreen, Screen};
pub use session::ScreenSession;
pub use window_events::{EventLoop, PollOutcome, ScreenEventKind};

use log::info;
use std::io::Write;
use std::sync::atomic::AtomicBool;

/// Runs the whole program against `screen`: list displays, compose both
/// windows, then print events until `running` is cleared.
///
/// Every handle is released before this returns, on success and on every
/// fatal error. Returns the number of events printed.
pub fn run_overlay<S: Screen>(
    screen: S,
    config: &OverlayConfig,
    running: &AtomicBool,
    out: &mut dyn Write,
) -> OverlayResult<usize> {
    let mut session = ScreenSession::open(screen)?;

    let ctx = session.context();
    let displays = display::list_available_displays(session.screen_mut(), ctx, out)?;
    info!("🖥️ {} display(s) found, targeting display {}", displays.len(), config.display_id);

    session.compose(config)?;
    display::print_setup_summary(out, config)?;

    session.create_event()?;
    let mut event_loop = EventLoop::new(config.poll_timeout());
    let count = event_loop.run(&mut session, running, out)?;
    Ok(count)
}
