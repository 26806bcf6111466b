// Startup output formatting

use super::DisplayInfo;
use crate::config::{OverlayConfig, WindowConfig};
use std::io::{self, Write};

/// Prints the display list in the form the user sees at startup
pub fn print_displays(out: &mut dyn Write, displays: &[DisplayInfo]) -> io::Result<()> {
    if displays.is_empty() {
        writeln!(out, "No displays found or error querying displays")?;
        return Ok(());
    }

    writeln!(out, "Available displays:")?;
    for display in displays {
        writeln!(
            out,
            "  Display {}: {}x{}",
            display.id, display.width, display.height
        )?;
    }
    Ok(())
}

/// Short human description of a window's size and look
pub fn describe_window(window: &WindowConfig) -> String {
    let alpha = window.color >> 24;
    if window.transparency.is_some() || alpha < 0xFF {
        return format!("{}x{} semi-transparent", window.width, window.height);
    }

    let color = match window.color {
        0xFF00_0000 => "black".to_string(),
        0xFFFF_FFFF => "white".to_string(),
        other => format!("#{:08X}", other),
    };
    format!(
        "{}x{} {} at position {},{}",
        window.width, window.height, color, window.x, window.y
    )
}

fn describe_touch(window: &WindowConfig) -> &'static str {
    if window.sensitive {
        "sensitive to touch"
    } else {
        "touch insensitive"
    }
}

/// Prints what was composed once both windows are posted
pub fn print_setup_summary(out: &mut dyn Write, config: &OverlayConfig) -> io::Result<()> {
    writeln!(out, "Windows created successfully!")?;
    writeln!(
        out,
        "Window 1: {} ({})",
        describe_window(&config.background),
        describe_touch(&config.background)
    )?;
    writeln!(
        out,
        "Window 2: {} ({})",
        describe_window(&config.overlay),
        describe_touch(&config.overlay)
    )?;
    if config.background.sensitive && !config.overlay.sensitive {
        writeln!(out, "Window 2 will pass all touches through to Window 1")?;
    }
    writeln!(out, "Press Ctrl+C to exit...")?;
    Ok(())
}
