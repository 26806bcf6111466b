// Back buffer provisioning and the fill-and-post step

use crate::errors::{OverlayError, OverlayResult, ScreenError, ScreenResult, WindowRole};
use crate::screen::Screen;
use log::{debug, warn};

/// Allocates `count` back buffers; failure is fatal for either window
pub fn provision_buffers<S: Screen>(
    screen: &mut S,
    window: S::Window,
    role: WindowRole,
    count: i32,
) -> OverlayResult<()> {
    debug!("{}: allocating {} buffer(s)", role, count);
    screen
        .create_window_buffers(window, count)
        .map_err(|source| OverlayError::BufferAllocation {
            window: role,
            source,
        })
}

/// Fetches the current render buffer, turning a null handle into an error
pub fn render_buffer<S: Screen>(screen: &mut S, window: S::Window) -> ScreenResult<S::Buffer> {
    screen
        .render_buffer(window)?
        .ok_or(ScreenError::NullHandle("render buffer"))
}

/// Fills the buffer with one ARGB colour and posts the whole buffer.
/// Neither step can stop the setup; failures are only logged.
pub fn fill_and_post<S: Screen>(
    screen: &mut S,
    ctx: S::Context,
    window: S::Window,
    buffer: S::Buffer,
    role: WindowRole,
    argb: u32,
) {
    debug!("{}: fill 0x{:08X}", role, argb);
    if let Err(e) = screen.fill(ctx, buffer, argb) {
        warn!("⚠️ Filling {} failed: {}", role, e);
    }
    if let Err(e) = screen.post_window(window, buffer, &[]) {
        warn!("⚠️ Posting {} failed: {}", role, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{ContextKind, HeadlessScreen};

    #[test]
    fn test_allocation_failure_carries_code() {
        let mut screen = HeadlessScreen::new();
        screen.fail_call("screen_create_window_buffers", 0, 5);
        let ctx = screen.create_context(ContextKind::Application).unwrap();
        let window = screen.create_window(ctx).unwrap();

        let err = provision_buffers(&mut screen, window, WindowRole::Background, 1).unwrap_err();
        assert_eq!(err.exit_code(), -1);
        assert!(err.to_string().contains('5'));
    }

    #[test]
    fn test_null_render_buffer_is_an_error() {
        let mut screen = HeadlessScreen::new();
        screen.null_render_buffer(0);
        let ctx = screen.create_context(ContextKind::Application).unwrap();
        let window = screen.create_window(ctx).unwrap();
        provision_buffers(&mut screen, window, WindowRole::Background, 1).unwrap();

        assert_eq!(
            render_buffer(&mut screen, window),
            Err(ScreenError::NullHandle("render buffer"))
        );
    }

    #[test]
    fn test_fill_and_post_sets_color_and_posts_once() {
        let mut screen = HeadlessScreen::new();
        let ctx = screen.create_context(ContextKind::Application).unwrap();
        let window = screen.create_window(ctx).unwrap();
        provision_buffers(&mut screen, window, WindowRole::Overlay, 1).unwrap();
        let buffer = render_buffer(&mut screen, window).unwrap();

        fill_and_post(&mut screen, ctx, window, buffer, WindowRole::Overlay, 0x8000_00FF);

        assert_eq!(screen.buffer_color(buffer), Some(0x8000_00FF));
        assert_eq!(screen.post_count(window), 1);
    }
}
