// Windowing service contract and its backends
pub mod headless;
pub mod sys;
#[cfg(target_os = "nto")]
pub mod qnx;

use crate::errors::ScreenResult;
use std::time::Duration;

pub use headless::HeadlessScreen;
#[cfg(target_os = "nto")]
pub use qnx::QnxScreen;

// Event type tags as the service reports them
pub const SCREEN_EVENT_NONE: i32 = 0;
pub const SCREEN_EVENT_CREATE: i32 = 1;
pub const SCREEN_EVENT_PROPERTY: i32 = 2;
pub const SCREEN_EVENT_CLOSE: i32 = 3;
pub const SCREEN_EVENT_INPUT: i32 = 4;
pub const SCREEN_EVENT_JOG: i32 = 5;
pub const SCREEN_EVENT_POINTER: i32 = 6;
pub const SCREEN_EVENT_KEYBOARD: i32 = 7;

/// Window usage flag for buffers written by the CPU through the native API
pub const SCREEN_USAGE_NATIVE: i32 = 1 << 3;

/// Kind of session requested from the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    Application,
}

/// Integer-vector window properties the overlay writes and reads back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowProperty {
    Usage,
    BufferSize,
    Position,
    ZOrder,
    Sensitivity,
    Transparency,
}

impl WindowProperty {
    /// Number of integers the property carries
    pub fn arity(self) -> usize {
        match self {
            WindowProperty::BufferSize => 2,
            WindowProperty::Position => 4,
            _ => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WindowProperty::Usage => "usage",
            WindowProperty::BufferSize => "buffer size",
            WindowProperty::Position => "position",
            WindowProperty::ZOrder => "z-order",
            WindowProperty::Sensitivity => "sensitivity",
            WindowProperty::Transparency => "transparency",
        }
    }
}

/// Integer event properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventProperty {
    Type,
    Position,
}

/// Everything the overlay needs from a compositor.
///
/// Handles are opaque to callers and only meaningful to the backend that
/// issued them. Every call blocks until the service answers.
pub trait Screen {
    type Context: Copy;
    type Display: Copy;
    type Window: Copy;
    type Buffer: Copy;
    type Event: Copy;

    fn create_context(&mut self, kind: ContextKind) -> ScreenResult<Self::Context>;
    fn destroy_context(&mut self, ctx: Self::Context) -> ScreenResult<()>;

    fn display_count(&mut self, ctx: Self::Context) -> ScreenResult<i32>;
    fn displays(&mut self, ctx: Self::Context, count: usize) -> ScreenResult<Vec<Self::Display>>;
    fn display_id(&mut self, display: Self::Display) -> ScreenResult<i32>;
    fn display_size(&mut self, display: Self::Display) -> ScreenResult<[i32; 2]>;

    fn create_window(&mut self, ctx: Self::Context) -> ScreenResult<Self::Window>;
    fn destroy_window(&mut self, window: Self::Window) -> ScreenResult<()>;
    fn set_window_iv(
        &mut self,
        window: Self::Window,
        property: WindowProperty,
        values: &[i32],
    ) -> ScreenResult<()>;
    fn get_window_iv(
        &mut self,
        window: Self::Window,
        property: WindowProperty,
        values: &mut [i32],
    ) -> ScreenResult<()>;
    /// Binds the window to a display id; the id is passed through uninspected
    fn set_window_display(&mut self, window: Self::Window, display_id: i32) -> ScreenResult<()>;

    fn create_window_buffers(&mut self, window: Self::Window, count: i32) -> ScreenResult<()>;
    /// Current render buffer; `Ok(None)` when the service succeeds with a null handle
    fn render_buffer(&mut self, window: Self::Window) -> ScreenResult<Option<Self::Buffer>>;

    fn fill(&mut self, ctx: Self::Context, buffer: Self::Buffer, argb: u32) -> ScreenResult<()>;
    fn post_window(
        &mut self,
        window: Self::Window,
        buffer: Self::Buffer,
        dirty_rects: &[[i32; 4]],
    ) -> ScreenResult<()>;
    fn flush_context(&mut self, ctx: Self::Context) -> ScreenResult<()>;

    fn create_event(&mut self) -> ScreenResult<Self::Event>;
    fn destroy_event(&mut self, event: Self::Event) -> ScreenResult<()>;
    /// Waits up to `timeout` for the next event and stores it in `event`
    fn get_event(
        &mut self,
        ctx: Self::Context,
        event: Self::Event,
        timeout: Duration,
    ) -> ScreenResult<()>;
    fn event_iv(
        &mut self,
        event: Self::Event,
        property: EventProperty,
        values: &mut [i32],
    ) -> ScreenResult<()>;
}
