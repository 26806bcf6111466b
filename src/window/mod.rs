// Window property configuration
pub mod buffer;

pub use buffer::{fill_and_post, provision_buffers, render_buffer};

use crate::config::WindowConfig;
use crate::errors::WindowRole;
use crate::screen::{Screen, WindowProperty, SCREEN_USAGE_NATIVE};
use log::{debug, warn};

/// Writes one property; a failure is logged and otherwise ignored
fn set_property<S: Screen>(
    screen: &mut S,
    window: S::Window,
    role: WindowRole,
    property: WindowProperty,
    values: &[i32],
) {
    debug!("{}: {} = {:?}", role, property.name(), values);
    if let Err(e) = screen.set_window_iv(window, property, values) {
        warn!("⚠️ Setting {} on {} failed: {}", property.name(), role, e);
    }
}

/// Usage, buffer size, position, z-order and target display
pub fn configure_placement<S: Screen>(
    screen: &mut S,
    window: S::Window,
    role: WindowRole,
    config: &WindowConfig,
    display_id: i32,
) {
    set_property(screen, window, role, WindowProperty::Usage, &[SCREEN_USAGE_NATIVE]);
    set_property(screen, window, role, WindowProperty::BufferSize, &config.size());
    set_property(screen, window, role, WindowProperty::Position, &config.rect());
    set_property(screen, window, role, WindowProperty::ZOrder, &[config.zorder]);

    debug!("{}: display = {}", role, display_id);
    if let Err(e) = screen.set_window_display(window, display_id) {
        warn!("⚠️ Binding {} to display {} failed: {}", role, display_id, e);
    }
}

/// Touch sensitivity and, when configured, window transparency
pub fn configure_input<S: Screen>(
    screen: &mut S,
    window: S::Window,
    role: WindowRole,
    config: &WindowConfig,
) {
    set_property(
        screen,
        window,
        role,
        WindowProperty::Sensitivity,
        &[i32::from(config.sensitive)],
    );
    if let Some(transparency) = config.transparency {
        set_property(
            screen,
            window,
            role,
            WindowProperty::Transparency,
            &[i32::from(transparency)],
        );
    }
}
