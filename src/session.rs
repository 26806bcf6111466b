// One session with the windowing service and everything created through it

use crate::config::OverlayConfig;
use crate::errors::{OverlayError, OverlayResult, ScreenError, ScreenResult, WindowRole};
use crate::screen::{ContextKind, EventProperty, Screen, SCREEN_EVENT_NONE, SCREEN_EVENT_POINTER};
use crate::window::{self, fill_and_post, provision_buffers, render_buffer};
use crate::window_events::ScreenEventKind;
use log::{debug, error, info, warn};
use std::time::Duration;

/// Owns the context, both windows, their render buffers and the event
/// receptacle. Dropping the session destroys the event, then the windows,
/// then the context, whatever state setup reached.
pub struct ScreenSession<S: Screen> {
    screen: S,
    ctx: S::Context,
    background: Option<S::Window>,
    overlay: Option<S::Window>,
    background_buffer: Option<S::Buffer>,
    overlay_buffer: Option<S::Buffer>,
    event: Option<S::Event>,
}

impl<S: Screen> ScreenSession<S> {
    /// Creates an application context; failure is fatal
    pub fn open(mut screen: S) -> OverlayResult<Self> {
        let ctx = screen
            .create_context(ContextKind::Application)
            .map_err(OverlayError::ContextCreation)?;
        debug!("screen context created");

        Ok(Self {
            screen,
            ctx,
            background: None,
            overlay: None,
            background_buffer: None,
            overlay_buffer: None,
            event: None,
        })
    }

    pub fn screen(&self) -> &S {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    pub fn context(&self) -> S::Context {
        self.ctx
    }

    pub fn background(&self) -> Option<S::Window> {
        self.background
    }

    pub fn overlay(&self) -> Option<S::Window> {
        self.overlay
    }

    /// Overlay render buffer; `None` when its retrieval failed during setup
    pub fn overlay_buffer(&self) -> Option<S::Buffer> {
        self.overlay_buffer
    }

    pub fn background_buffer(&self) -> Option<S::Buffer> {
        self.background_buffer
    }

    fn create_window(&mut self, role: WindowRole) -> OverlayResult<S::Window> {
        let window = self
            .screen
            .create_window(self.ctx)
            .map_err(|source| OverlayError::WindowCreation {
                window: role,
                source,
            })?;
        match role {
            WindowRole::Background => self.background = Some(window),
            WindowRole::Overlay => self.overlay = Some(window),
        }
        debug!("{} created", role);
        Ok(window)
    }

    /// Creates, configures, fills and posts both windows, then flushes once.
    ///
    /// Creation, buffer allocation and the background's render buffer are
    /// fatal. A missing overlay render buffer is reported on stderr and the
    /// overlay is left unfilled and unposted.
    pub fn compose(&mut self, config: &OverlayConfig) -> OverlayResult<()> {
        let background = self.create_window(WindowRole::Background)?;
        let overlay = self.create_window(WindowRole::Overlay)?;

        window::configure_placement(
            &mut self.screen,
            background,
            WindowRole::Background,
            &config.background,
            config.display_id,
        );
        window::configure_placement(
            &mut self.screen,
            overlay,
            WindowRole::Overlay,
            &config.overlay,
            config.display_id,
        );

        provision_buffers(
            &mut self.screen,
            background,
            WindowRole::Background,
            config.buffer_count,
        )?;
        provision_buffers(
            &mut self.screen,
            overlay,
            WindowRole::Overlay,
            config.buffer_count,
        )?;

        let background_buffer = render_buffer(&mut self.screen, background).map_err(|source| {
            OverlayError::RenderBuffer {
                window: WindowRole::Background,
                source,
            }
        })?;
        self.background_buffer = Some(background_buffer);

        self.overlay_buffer = match render_buffer(&mut self.screen, overlay) {
            Ok(buffer) => Some(buffer),
            Err(e) => {
                eprintln!(
                    "ERROR: Failed to get render buffer for {}: {}",
                    WindowRole::Overlay,
                    e.code()
                );
                error!("❌ Overlay render buffer unavailable: {}", e);
                None
            }
        };

        window::configure_input(
            &mut self.screen,
            background,
            WindowRole::Background,
            &config.background,
        );
        window::configure_input(&mut self.screen, overlay, WindowRole::Overlay, &config.overlay);

        fill_and_post(
            &mut self.screen,
            self.ctx,
            background,
            background_buffer,
            WindowRole::Background,
            config.background.color,
        );
        match self.overlay_buffer {
            Some(buffer) => fill_and_post(
                &mut self.screen,
                self.ctx,
                overlay,
                buffer,
                WindowRole::Overlay,
                config.overlay.color,
            ),
            None => warn!("⚠️ Skipping fill and post for {}: no render buffer", WindowRole::Overlay),
        }

        if let Err(e) = self.screen.flush_context(self.ctx) {
            warn!("⚠️ Context flush failed: {}", e);
        }
        info!("✅ Both windows posted");
        Ok(())
    }

    /// Creates the event receptacle reused by every poll
    pub fn create_event(&mut self) -> OverlayResult<()> {
        if self.event.is_none() {
            let event = self
                .screen
                .create_event()
                .map_err(OverlayError::EventCreation)?;
            self.event = Some(event);
        }
        Ok(())
    }

    /// Waits up to `timeout` for the next event and classifies it; an empty
    /// event counts as a timeout
    pub fn next_event(&mut self, timeout: Duration) -> ScreenResult<ScreenEventKind> {
        let event = match self.event {
            Some(event) => event,
            None => {
                let event = self.screen.create_event()?;
                self.event = Some(event);
                event
            }
        };

        self.screen.get_event(self.ctx, event, timeout)?;

        let mut event_type = [0];
        self.screen.event_iv(event, EventProperty::Type, &mut event_type)?;
        // a wait that elapses succeeds with an empty event
        if event_type[0] == SCREEN_EVENT_NONE {
            return Err(ScreenError::Timeout);
        }

        let mut position = [0, 0];
        if event_type[0] == SCREEN_EVENT_POINTER {
            if let Err(e) = self
                .screen
                .event_iv(event, EventProperty::Position, &mut position)
            {
                warn!("⚠️ Pointer position unavailable: {}", e);
            }
        }

        Ok(ScreenEventKind::from_raw(event_type[0], position))
    }

    fn teardown(&mut self) {
        if let Some(event) = self.event.take() {
            if let Err(e) = self.screen.destroy_event(event) {
                warn!("⚠️ Destroying event failed: {}", e);
            }
        }
        self.background_buffer = None;
        self.overlay_buffer = None;
        for (role, window) in [
            (WindowRole::Background, self.background.take()),
            (WindowRole::Overlay, self.overlay.take()),
        ] {
            if let Some(window) = window {
                if let Err(e) = self.screen.destroy_window(window) {
                    warn!("⚠️ Destroying {} failed: {}", role, e);
                }
            }
        }
        if let Err(e) = self.screen.destroy_context(self.ctx) {
            warn!("⚠️ Destroying context failed: {}", e);
        }
        debug!("🧹 screen session released");
    }
}

impl<S: Screen> Drop for ScreenSession<S> {
    fn drop(&mut self) {
        self.teardown();
    }
}
