// Display enumeration and formatting
pub mod formatters;

pub use formatters::{describe_window, print_displays, print_setup_summary};

use crate::screen::Screen;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Id and pixel size of one display, as reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayInfo {
    pub id: i32,
    pub width: i32,
    pub height: i32,
}

/// Queries the displays known to the context. A failed query is treated as
/// "no displays"; a failed per-display read leaves that field at 0.
pub fn enumerate_displays<S: Screen>(screen: &mut S, ctx: S::Context) -> Vec<DisplayInfo> {
    let count = match screen.display_count(ctx) {
        Ok(count) if count > 0 => count as usize,
        Ok(_) => return Vec::new(),
        Err(e) => {
            warn!("⚠️ Display count query failed: {}", e);
            return Vec::new();
        }
    };

    let handles = match screen.displays(ctx, count) {
        Ok(handles) => handles,
        Err(e) => {
            warn!("⚠️ Display handle query failed: {}", e);
            return Vec::new();
        }
    };

    handles
        .into_iter()
        .map(|display| {
            let id = screen.display_id(display).unwrap_or_else(|e| {
                warn!("⚠️ Display id query failed: {}", e);
                0
            });
            let [width, height] = screen.display_size(display).unwrap_or_else(|e| {
                warn!("⚠️ Display size query failed: {}", e);
                [0, 0]
            });
            debug!("display {}: {}x{}", id, width, height);
            DisplayInfo { id, width, height }
        })
        .collect()
}

/// Enumerates and prints in one step
pub fn list_available_displays<S: Screen>(
    screen: &mut S,
    ctx: S::Context,
    out: &mut dyn Write,
) -> io::Result<Vec<DisplayInfo>> {
    let displays = enumerate_displays(screen, ctx);
    print_displays(out, &displays)?;
    Ok(displays)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{ContextKind, HeadlessScreen};

    #[test]
    fn test_lists_each_display() {
        let mut screen = HeadlessScreen::new()
            .with_display(1, 1920, 1080)
            .with_display(2, 800, 480);
        let ctx = screen.create_context(ContextKind::Application).unwrap();

        let mut out = Vec::new();
        let displays = list_available_displays(&mut screen, ctx, &mut out).unwrap();

        assert_eq!(displays.len(), 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Available displays:\n  Display 1: 1920x1080\n  Display 2: 800x480\n"
        );
    }

    #[test]
    fn test_failed_count_query_means_no_displays() {
        let mut screen = HeadlessScreen::new().with_display(1, 1920, 1080);
        screen.fail_call("screen_get_context_property_iv", 0, 5);
        let ctx = screen.create_context(ContextKind::Application).unwrap();

        let mut out = Vec::new();
        let displays = list_available_displays(&mut screen, ctx, &mut out).unwrap();

        assert!(displays.is_empty());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "No displays found or error querying displays\n"
        );
    }

    #[test]
    fn test_failed_size_read_reports_zero() {
        let mut screen = HeadlessScreen::new().with_display(4, 1024, 768);
        // id read is occurrence 0, size read is occurrence 1
        screen.fail_call("screen_get_display_property_iv", 1, 5);
        let ctx = screen.create_context(ContextKind::Application).unwrap();

        let displays = enumerate_displays(&mut screen, ctx);
        assert_eq!(
            displays,
            vec![DisplayInfo {
                id: 4,
                width: 0,
                height: 0
            }]
        );
    }
}
