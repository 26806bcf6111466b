// libscreen backend for QNX Neutrino targets
#![allow(non_camel_case_types)]

use super::sys::*;
use super::{ContextKind, EventProperty, Screen, WindowProperty};
use crate::errors::{ScreenError, ScreenResult};
use std::os::raw::{c_int, c_void};
use std::ptr;
use std::time::Duration;

pub type screen_context_t = *mut c_void;
pub type screen_display_t = *mut c_void;
pub type screen_window_t = *mut c_void;
pub type screen_buffer_t = *mut c_void;
pub type screen_event_t = *mut c_void;

#[link(name = "screen")]
extern "C" {
    fn screen_create_context(pctx: *mut screen_context_t, flags: c_int) -> c_int;
    fn screen_destroy_context(ctx: screen_context_t) -> c_int;
    fn screen_get_context_property_iv(ctx: screen_context_t, pname: c_int, param: *mut c_int) -> c_int;
    fn screen_get_context_property_pv(
        ctx: screen_context_t,
        pname: c_int,
        param: *mut *mut c_void,
    ) -> c_int;
    fn screen_get_display_property_iv(disp: screen_display_t, pname: c_int, param: *mut c_int) -> c_int;
    fn screen_create_window(pwin: *mut screen_window_t, ctx: screen_context_t) -> c_int;
    fn screen_destroy_window(win: screen_window_t) -> c_int;
    fn screen_set_window_property_iv(win: screen_window_t, pname: c_int, param: *const c_int) -> c_int;
    fn screen_get_window_property_iv(win: screen_window_t, pname: c_int, param: *mut c_int) -> c_int;
    fn screen_set_window_property_pv(win: screen_window_t, pname: c_int, param: *mut *mut c_void) -> c_int;
    fn screen_get_window_property_pv(win: screen_window_t, pname: c_int, param: *mut *mut c_void) -> c_int;
    fn screen_create_window_buffers(win: screen_window_t, count: c_int) -> c_int;
    fn screen_fill(ctx: screen_context_t, dst: screen_buffer_t, attribs: *const c_int) -> c_int;
    fn screen_post_window(
        win: screen_window_t,
        buf: screen_buffer_t,
        count: c_int,
        dirty_rects: *const c_int,
        flags: c_int,
    ) -> c_int;
    fn screen_flush_context(ctx: screen_context_t, flags: c_int) -> c_int;
    fn screen_create_event(pev: *mut screen_event_t) -> c_int;
    fn screen_destroy_event(ev: screen_event_t) -> c_int;
    fn screen_get_event(ctx: screen_context_t, ev: screen_event_t, timeout: u64) -> c_int;
    fn screen_get_event_property_iv(ev: screen_event_t, pname: c_int, param: *mut c_int) -> c_int;
}

fn check(call: &'static str, rc: c_int) -> ScreenResult<()> {
    if rc == 0 {
        Ok(())
    } else {
        Err(ScreenError::Call {
            call,
            code: std::io::Error::last_os_error().raw_os_error().unwrap_or(rc),
        })
    }
}

fn window_pname(property: WindowProperty) -> c_int {
    match property {
        WindowProperty::Usage => SCREEN_PROPERTY_USAGE,
        WindowProperty::BufferSize => SCREEN_PROPERTY_BUFFER_SIZE,
        WindowProperty::Position => SCREEN_PROPERTY_POSITION,
        WindowProperty::ZOrder => SCREEN_PROPERTY_ZORDER,
        WindowProperty::Sensitivity => SCREEN_PROPERTY_SENSITIVITY,
        WindowProperty::Transparency => SCREEN_PROPERTY_TRANSPARENCY,
    }
}

/// Backend that talks to the Screen Graphics Subsystem through libscreen
#[derive(Debug, Default)]
pub struct QnxScreen;

impl QnxScreen {
    pub fn new() -> Self {
        Self
    }
}

impl Screen for QnxScreen {
    type Context = screen_context_t;
    type Display = screen_display_t;
    type Window = screen_window_t;
    type Buffer = screen_buffer_t;
    type Event = screen_event_t;

    fn create_context(&mut self, kind: ContextKind) -> ScreenResult<screen_context_t> {
        let flags = match kind {
            ContextKind::Application => SCREEN_APPLICATION_CONTEXT,
        };
        let mut ctx: screen_context_t = ptr::null_mut();
        unsafe {
            check("screen_create_context", screen_create_context(&mut ctx, flags))?;
        }
        Ok(ctx)
    }

    fn destroy_context(&mut self, ctx: screen_context_t) -> ScreenResult<()> {
        unsafe { check("screen_destroy_context", screen_destroy_context(ctx)) }
    }

    fn display_count(&mut self, ctx: screen_context_t) -> ScreenResult<i32> {
        let mut count: c_int = 0;
        unsafe {
            check(
                "screen_get_context_property_iv",
                screen_get_context_property_iv(ctx, SCREEN_PROPERTY_DISPLAY_COUNT, &mut count),
            )?;
        }
        Ok(count)
    }

    fn displays(&mut self, ctx: screen_context_t, count: usize) -> ScreenResult<Vec<screen_display_t>> {
        let mut handles: Vec<screen_display_t> = vec![ptr::null_mut(); count];
        unsafe {
            check(
                "screen_get_context_property_pv",
                screen_get_context_property_pv(ctx, SCREEN_PROPERTY_DISPLAYS, handles.as_mut_ptr()),
            )?;
        }
        Ok(handles)
    }

    fn display_id(&mut self, display: screen_display_t) -> ScreenResult<i32> {
        let mut id: c_int = 0;
        unsafe {
            check(
                "screen_get_display_property_iv",
                screen_get_display_property_iv(display, SCREEN_PROPERTY_ID, &mut id),
            )?;
        }
        Ok(id)
    }

    fn display_size(&mut self, display: screen_display_t) -> ScreenResult<[i32; 2]> {
        let mut size: [c_int; 2] = [0, 0];
        unsafe {
            check(
                "screen_get_display_property_iv",
                screen_get_display_property_iv(display, SCREEN_PROPERTY_SIZE, size.as_mut_ptr()),
            )?;
        }
        Ok(size)
    }

    fn create_window(&mut self, ctx: screen_context_t) -> ScreenResult<screen_window_t> {
        let mut window: screen_window_t = ptr::null_mut();
        unsafe {
            check("screen_create_window", screen_create_window(&mut window, ctx))?;
        }
        Ok(window)
    }

    fn destroy_window(&mut self, window: screen_window_t) -> ScreenResult<()> {
        unsafe { check("screen_destroy_window", screen_destroy_window(window)) }
    }

    fn set_window_iv(
        &mut self,
        window: screen_window_t,
        property: WindowProperty,
        values: &[i32],
    ) -> ScreenResult<()> {
        if values.len() < property.arity() {
            return Err(ScreenError::Call {
                call: "screen_set_window_property_iv",
                code: 22,
            });
        }
        unsafe {
            check(
                "screen_set_window_property_iv",
                screen_set_window_property_iv(window, window_pname(property), values.as_ptr()),
            )
        }
    }

    fn get_window_iv(
        &mut self,
        window: screen_window_t,
        property: WindowProperty,
        values: &mut [i32],
    ) -> ScreenResult<()> {
        if values.len() < property.arity() {
            return Err(ScreenError::Call {
                call: "screen_get_window_property_iv",
                code: 22,
            });
        }
        unsafe {
            check(
                "screen_get_window_property_iv",
                screen_get_window_property_iv(window, window_pname(property), values.as_mut_ptr()),
            )
        }
    }

    fn set_window_display(&mut self, window: screen_window_t, display_id: i32) -> ScreenResult<()> {
        let mut id: c_int = display_id;
        unsafe {
            check(
                "screen_set_window_property_pv",
                screen_set_window_property_pv(
                    window,
                    SCREEN_PROPERTY_DISPLAY,
                    &mut id as *mut c_int as *mut *mut c_void,
                ),
            )
        }
    }

    fn create_window_buffers(&mut self, window: screen_window_t, count: i32) -> ScreenResult<()> {
        unsafe {
            check(
                "screen_create_window_buffers",
                screen_create_window_buffers(window, count),
            )
        }
    }

    fn render_buffer(&mut self, window: screen_window_t) -> ScreenResult<Option<screen_buffer_t>> {
        // libscreen writes one handle per allocated buffer
        let mut count: c_int = 0;
        unsafe {
            check(
                "screen_get_window_property_iv",
                screen_get_window_property_iv(window, SCREEN_PROPERTY_RENDER_BUFFER_COUNT, &mut count),
            )?;
        }
        let mut buffers: Vec<screen_buffer_t> = vec![ptr::null_mut(); count.max(1) as usize];
        unsafe {
            check(
                "screen_get_window_property_pv",
                screen_get_window_property_pv(
                    window,
                    SCREEN_PROPERTY_RENDER_BUFFERS,
                    buffers.as_mut_ptr(),
                ),
            )?;
        }
        Ok(buffers.first().copied().filter(|buffer| !buffer.is_null()))
    }

    fn fill(&mut self, ctx: screen_context_t, buffer: screen_buffer_t, argb: u32) -> ScreenResult<()> {
        let attribs: [c_int; 3] = [SCREEN_BLIT_COLOR, argb as c_int, SCREEN_BLIT_END];
        unsafe { check("screen_fill", screen_fill(ctx, buffer, attribs.as_ptr())) }
    }

    fn post_window(
        &mut self,
        window: screen_window_t,
        buffer: screen_buffer_t,
        dirty_rects: &[[i32; 4]],
    ) -> ScreenResult<()> {
        let rects = if dirty_rects.is_empty() {
            ptr::null()
        } else {
            dirty_rects.as_ptr() as *const c_int
        };
        unsafe {
            check(
                "screen_post_window",
                screen_post_window(window, buffer, dirty_rects.len() as c_int, rects, 0),
            )
        }
    }

    fn flush_context(&mut self, ctx: screen_context_t) -> ScreenResult<()> {
        unsafe { check("screen_flush_context", screen_flush_context(ctx, 0)) }
    }

    fn create_event(&mut self) -> ScreenResult<screen_event_t> {
        let mut event: screen_event_t = ptr::null_mut();
        unsafe {
            check("screen_create_event", screen_create_event(&mut event))?;
        }
        Ok(event)
    }

    fn destroy_event(&mut self, event: screen_event_t) -> ScreenResult<()> {
        unsafe { check("screen_destroy_event", screen_destroy_event(event)) }
    }

    fn get_event(
        &mut self,
        ctx: screen_context_t,
        event: screen_event_t,
        timeout: Duration,
    ) -> ScreenResult<()> {
        // libscreen takes the timeout in nanoseconds
        let timeout_ns = u64::try_from(timeout.as_nanos()).unwrap_or(u64::MAX);
        unsafe { check("screen_get_event", screen_get_event(ctx, event, timeout_ns)) }
    }

    fn event_iv(
        &mut self,
        event: screen_event_t,
        property: EventProperty,
        values: &mut [i32],
    ) -> ScreenResult<()> {
        let (pname, arity) = match property {
            EventProperty::Type => (SCREEN_PROPERTY_TYPE, 1),
            EventProperty::Position => (SCREEN_PROPERTY_POSITION, 2),
        };
        if values.len() < arity {
            return Err(ScreenError::Call {
                call: "screen_get_event_property_iv",
                code: 22,
            });
        }
        unsafe {
            check(
                "screen_get_event_property_iv",
                screen_get_event_property_iv(event, pname, values.as_mut_ptr()),
            )
        }
    }
}
