// In-process compositor: a property store with buffer colours, post/flush
// counters, a scripted event queue and per-call failure injection.

use super::{ContextKind, EventProperty, Screen, WindowProperty};
use crate::errors::{ScreenError, ScreenResult};
use log::{debug, trace};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

const EINVAL: i32 = 22;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayHandle(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(u32);
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventId(u32);

/// An event as the service delivers it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawEvent {
    pub type_tag: i32,
    pub position: [i32; 2],
}

impl RawEvent {
    pub fn new(type_tag: i32) -> Self {
        Self {
            type_tag,
            position: [0, 0],
        }
    }

    pub fn pointer(x: i32, y: i32) -> Self {
        Self {
            type_tag: super::SCREEN_EVENT_POINTER,
            position: [x, y],
        }
    }
}

/// One scripted answer to `get_event`
#[derive(Debug, Clone, Copy)]
enum Poll {
    Event(RawEvent),
    Timeout,
    Fail(i32),
}

#[derive(Debug, Default)]
struct WindowState {
    properties: HashMap<WindowProperty, Vec<i32>>,
    display: Option<i32>,
    buffers: Vec<BufferId>,
    posts: usize,
}

#[derive(Debug, Default)]
struct BufferState {
    color: Option<u32>,
}

#[derive(Debug)]
struct InjectedFailure {
    call: &'static str,
    occurrence: usize,
    code: i32,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_handle: u32,
    contexts: HashMap<ContextId, usize>,
    displays: Vec<(i32, [i32; 2])>,
    windows: HashMap<WindowId, WindowState>,
    window_order: Vec<WindowId>,
    buffers: HashMap<BufferId, BufferState>,
    events: HashMap<EventId, RawEvent>,
    pending: VecDeque<Poll>,
    failures: Vec<InjectedFailure>,
    null_render_buffers: Vec<usize>,
    calls: HashMap<&'static str, usize>,
    idle_wait: bool,
    stop_when_drained: Option<Arc<AtomicBool>>,
}

impl HeadlessState {
    fn next(&mut self) -> u32 {
        self.next_handle += 1;
        self.next_handle
    }

    /// Records the call and returns its 0-based occurrence, or the injected failure
    fn enter(&mut self, call: &'static str) -> ScreenResult<usize> {
        let count = self.calls.entry(call).or_insert(0);
        let occurrence = *count;
        *count += 1;
        trace!("headless: {} #{}", call, occurrence);

        match self
            .failures
            .iter()
            .find(|f| f.call == call && f.occurrence == occurrence)
        {
            Some(failure) => Err(ScreenError::Call {
                call,
                code: failure.code,
            }),
            None => Ok(occurrence),
        }
    }

    fn window_mut(&mut self, window: WindowId) -> ScreenResult<&mut WindowState> {
        self.windows
            .get_mut(&window)
            .ok_or(ScreenError::UnknownHandle("window"))
    }
}

/// Compositor that lives inside the process.
///
/// Cloning yields another handle onto the same state, so a test can keep a
/// probe while the session owns the backend.
#[derive(Debug, Clone, Default)]
pub struct HeadlessScreen {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a display with the given id and pixel size
    pub fn with_display(self, id: i32, width: i32, height: i32) -> Self {
        self.state.borrow_mut().displays.push((id, [width, height]));
        self
    }

    /// Sleep for the poll timeout when no event is queued, like a real service
    pub fn with_idle_wait(self, idle_wait: bool) -> Self {
        self.state.borrow_mut().idle_wait = idle_wait;
        self
    }

    /// Clears `running` once the scripted event queue has been consumed
    pub fn stop_when_drained(&self, running: Arc<AtomicBool>) {
        self.state.borrow_mut().stop_when_drained = Some(running);
    }

    /// Makes the `occurrence`-th (0-based) call named `call` fail with `code`
    pub fn fail_call(&self, call: &'static str, occurrence: usize, code: i32) {
        self.state.borrow_mut().failures.push(InjectedFailure {
            call,
            occurrence,
            code,
        });
    }

    /// Makes the `occurrence`-th render buffer query succeed with a null handle
    pub fn null_render_buffer(&self, occurrence: usize) {
        self.state.borrow_mut().null_render_buffers.push(occurrence);
    }

    pub fn push_event(&self, event: RawEvent) {
        self.state.borrow_mut().pending.push_back(Poll::Event(event));
    }

    pub fn push_timeout(&self) {
        self.state.borrow_mut().pending.push_back(Poll::Timeout);
    }

    pub fn push_poll_failure(&self, code: i32) {
        self.state.borrow_mut().pending.push_back(Poll::Fail(code));
    }

    /// Windows in creation order, destroyed ones excluded
    pub fn windows(&self) -> Vec<WindowId> {
        let state = self.state.borrow();
        state
            .window_order
            .iter()
            .filter(|w| state.windows.contains_key(*w))
            .copied()
            .collect()
    }

    pub fn window_property(&self, window: WindowId, property: WindowProperty) -> Option<Vec<i32>> {
        self.state
            .borrow()
            .windows
            .get(&window)
            .and_then(|w| w.properties.get(&property).cloned())
    }

    pub fn window_display(&self, window: WindowId) -> Option<i32> {
        self.state.borrow().windows.get(&window).and_then(|w| w.display)
    }

    /// Colour of the window's render buffer, if it has been filled
    pub fn window_fill(&self, window: WindowId) -> Option<u32> {
        let state = self.state.borrow();
        let buffer = state.windows.get(&window)?.buffers.first()?;
        state.buffers.get(buffer)?.color
    }

    pub fn buffer_color(&self, buffer: BufferId) -> Option<u32> {
        self.state.borrow().buffers.get(&buffer).and_then(|b| b.color)
    }

    pub fn post_count(&self, window: WindowId) -> usize {
        self.state
            .borrow()
            .windows
            .get(&window)
            .map(|w| w.posts)
            .unwrap_or(0)
    }

    /// Total flushes across all contexts, destroyed ones excluded
    pub fn flush_count(&self) -> usize {
        self.state.borrow().contexts.values().sum()
    }

    pub fn call_count(&self, call: &str) -> usize {
        self.state.borrow().calls.get(call).copied().unwrap_or(0)
    }

    pub fn live_contexts(&self) -> usize {
        self.state.borrow().contexts.len()
    }

    pub fn live_windows(&self) -> usize {
        self.state.borrow().windows.len()
    }

    pub fn live_events(&self) -> usize {
        self.state.borrow().events.len()
    }
}

impl Screen for HeadlessScreen {
    type Context = ContextId;
    type Display = DisplayHandle;
    type Window = WindowId;
    type Buffer = BufferId;
    type Event = EventId;

    fn create_context(&mut self, kind: ContextKind) -> ScreenResult<ContextId> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_create_context")?;
        let ctx = ContextId(state.next());
        state.contexts.insert(ctx, 0);
        debug!("headless: created {:?} context {:?}", kind, ctx);
        Ok(ctx)
    }

    fn destroy_context(&mut self, ctx: ContextId) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_destroy_context")?;
        state
            .contexts
            .remove(&ctx)
            .map(|_| ())
            .ok_or(ScreenError::UnknownHandle("context"))
    }

    fn display_count(&mut self, _ctx: ContextId) -> ScreenResult<i32> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_get_context_property_iv")?;
        Ok(state.displays.len() as i32)
    }

    fn displays(&mut self, _ctx: ContextId, count: usize) -> ScreenResult<Vec<DisplayHandle>> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_get_context_property_pv")?;
        Ok((0..count.min(state.displays.len())).map(DisplayHandle).collect())
    }

    fn display_id(&mut self, display: DisplayHandle) -> ScreenResult<i32> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_get_display_property_iv")?;
        state
            .displays
            .get(display.0)
            .map(|(id, _)| *id)
            .ok_or(ScreenError::UnknownHandle("display"))
    }

    fn display_size(&mut self, display: DisplayHandle) -> ScreenResult<[i32; 2]> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_get_display_property_iv")?;
        state
            .displays
            .get(display.0)
            .map(|(_, size)| *size)
            .ok_or(ScreenError::UnknownHandle("display"))
    }

    fn create_window(&mut self, ctx: ContextId) -> ScreenResult<WindowId> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_create_window")?;
        if !state.contexts.contains_key(&ctx) {
            return Err(ScreenError::UnknownHandle("context"));
        }
        let window = WindowId(state.next());
        state.windows.insert(window, WindowState::default());
        state.window_order.push(window);
        Ok(window)
    }

    fn destroy_window(&mut self, window: WindowId) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_destroy_window")?;
        let removed = state
            .windows
            .remove(&window)
            .ok_or(ScreenError::UnknownHandle("window"))?;
        for buffer in removed.buffers {
            state.buffers.remove(&buffer);
        }
        Ok(())
    }

    fn set_window_iv(
        &mut self,
        window: WindowId,
        property: WindowProperty,
        values: &[i32],
    ) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_set_window_property_iv")?;
        if values.len() < property.arity() {
            return Err(ScreenError::Call {
                call: "screen_set_window_property_iv",
                code: EINVAL,
            });
        }
        let stored = values[..property.arity()].to_vec();
        state.window_mut(window)?.properties.insert(property, stored);
        Ok(())
    }

    fn get_window_iv(
        &mut self,
        window: WindowId,
        property: WindowProperty,
        values: &mut [i32],
    ) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_get_window_property_iv")?;
        let stored = state
            .window_mut(window)?
            .properties
            .get(&property)
            .cloned()
            .unwrap_or_else(|| vec![0; property.arity()]);
        for (slot, value) in values.iter_mut().zip(stored) {
            *slot = value;
        }
        Ok(())
    }

    fn set_window_display(&mut self, window: WindowId, display_id: i32) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_set_window_property_pv")?;
        state.window_mut(window)?.display = Some(display_id);
        Ok(())
    }

    fn create_window_buffers(&mut self, window: WindowId, count: i32) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_create_window_buffers")?;
        if count <= 0 {
            return Err(ScreenError::Call {
                call: "screen_create_window_buffers",
                code: EINVAL,
            });
        }
        state.window_mut(window)?;
        let mut created = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let buffer = BufferId(state.next());
            state.buffers.insert(buffer, BufferState::default());
            created.push(buffer);
        }
        state.window_mut(window)?.buffers = created;
        Ok(())
    }

    fn render_buffer(&mut self, window: WindowId) -> ScreenResult<Option<BufferId>> {
        let mut state = self.state.borrow_mut();
        let occurrence = state.enter("screen_get_window_property_pv")?;
        if state.null_render_buffers.contains(&occurrence) {
            return Ok(None);
        }
        Ok(state.window_mut(window)?.buffers.first().copied())
    }

    fn fill(&mut self, ctx: ContextId, buffer: BufferId, argb: u32) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_fill")?;
        if !state.contexts.contains_key(&ctx) {
            return Err(ScreenError::UnknownHandle("context"));
        }
        state
            .buffers
            .get_mut(&buffer)
            .ok_or(ScreenError::UnknownHandle("buffer"))?
            .color = Some(argb);
        Ok(())
    }

    fn post_window(
        &mut self,
        window: WindowId,
        buffer: BufferId,
        _dirty_rects: &[[i32; 4]],
    ) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_post_window")?;
        let target = state.window_mut(window)?;
        if !target.buffers.contains(&buffer) {
            return Err(ScreenError::UnknownHandle("buffer"));
        }
        target.posts += 1;
        Ok(())
    }

    fn flush_context(&mut self, ctx: ContextId) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_flush_context")?;
        let flushes = state
            .contexts
            .get_mut(&ctx)
            .ok_or(ScreenError::UnknownHandle("context"))?;
        *flushes += 1;
        Ok(())
    }

    fn create_event(&mut self) -> ScreenResult<EventId> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_create_event")?;
        let event = EventId(state.next());
        state.events.insert(event, RawEvent::default());
        Ok(event)
    }

    fn destroy_event(&mut self, event: EventId) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_destroy_event")?;
        state
            .events
            .remove(&event)
            .map(|_| ())
            .ok_or(ScreenError::UnknownHandle("event"))
    }

    fn get_event(&mut self, ctx: ContextId, event: EventId, timeout: Duration) -> ScreenResult<()> {
        let (next, idle_wait) = {
            let mut state = self.state.borrow_mut();
            state.enter("screen_get_event")?;
            if !state.contexts.contains_key(&ctx) {
                return Err(ScreenError::UnknownHandle("context"));
            }
            let next = state.pending.pop_front();
            if state.pending.is_empty() {
                if let Some(running) = state.stop_when_drained.as_ref() {
                    running.store(false, Ordering::SeqCst);
                }
            }
            (next, state.idle_wait)
        };

        match next {
            Some(Poll::Event(raw)) => {
                let mut state = self.state.borrow_mut();
                let slot = state
                    .events
                    .get_mut(&event)
                    .ok_or(ScreenError::UnknownHandle("event"))?;
                *slot = raw;
                Ok(())
            }
            Some(Poll::Fail(code)) => Err(ScreenError::Call {
                call: "screen_get_event",
                code,
            }),
            Some(Poll::Timeout) => Err(ScreenError::Timeout),
            None => {
                if idle_wait {
                    std::thread::sleep(timeout);
                }
                Err(ScreenError::Timeout)
            }
        }
    }

    fn event_iv(
        &mut self,
        event: EventId,
        property: EventProperty,
        values: &mut [i32],
    ) -> ScreenResult<()> {
        let mut state = self.state.borrow_mut();
        state.enter("screen_get_event_property_iv")?;
        let raw = *state
            .events
            .get(&event)
            .ok_or(ScreenError::UnknownHandle("event"))?;
        match property {
            EventProperty::Type => {
                if let Some(slot) = values.first_mut() {
                    *slot = raw.type_tag;
                }
            }
            EventProperty::Position => {
                for (slot, value) in values.iter_mut().zip(raw.position) {
                    *slot = value;
                }
            }
        }
        Ok(())
    }
}
