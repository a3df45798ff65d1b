//! Marker preview and confirmation gate
//!
//! Prints the marker grid to the terminal, optionally opens the written PNG
//! in the platform image viewer, then blocks until Enter is pressed.

use markertile_core::{ConfirmGate, EmitError, MarkerImage, MarkerPattern};
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, warn};

pub struct TerminalPreview {
    /// Show the preview and wait; when false only the save is reported
    interactive: bool,
    open_viewer: bool,
}

impl TerminalPreview {
    pub fn new(interactive: bool, open_viewer: bool) -> Self {
        Self {
            interactive,
            open_viewer,
        }
    }
}

impl ConfirmGate for TerminalPreview {
    fn confirm(&mut self, marker: &MarkerImage, image_path: &Path) -> Result<(), EmitError> {
        println!("Saved: {}", image_path.display());
        if !self.interactive {
            return Ok(());
        }

        println!();
        println!("{}", render_marker_terminal(&marker.pattern));
        println!();

        if self.open_viewer {
            match open::that(image_path) {
                Ok(()) => debug!(path = %image_path.display(), "Opened marker in image viewer"),
                Err(e) => warn!(error = %e, "Could not open image viewer"),
            }
        }

        println!("Press Enter to create the simulation model...");
        let mut line = String::new();
        // EOF counts as confirmation
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(())
    }
}

/// Render a marker grid as terminal-friendly string using Unicode block characters
pub fn render_marker_terminal(pattern: &MarkerPattern) -> String {
    let width = pattern.cells();

    let mut result = String::new();

    // Top quiet zone (white)
    result.push_str(&"  ".repeat(width as usize + 4));
    result.push('\n');
    result.push_str(&"  ".repeat(width as usize + 4));
    result.push('\n');

    // Two grid rows per terminal line using half-block characters
    for y in (0..width).step_by(2) {
        result.push_str("    ");

        for x in 0..width {
            let top_dark = !pattern.is_white(x, y);
            let bottom_dark = y + 1 < width && !pattern.is_white(x, y + 1);

            let ch = match (top_dark, bottom_dark) {
                (true, true) => "\u{2588}\u{2588}",
                (true, false) => "\u{2580}\u{2580}",
                (false, true) => "\u{2584}\u{2584}",
                (false, false) => "  ",
            };
            result.push_str(ch);
        }

        result.push_str("    ");
        result.push('\n');
    }

    // Bottom quiet zone (white)
    result.push_str(&"  ".repeat(width as usize + 4));
    result.push('\n');
    result.push_str(&"  ".repeat(width as usize + 4));

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use markertile_core::Dictionary;

    #[test]
    fn test_render_dimensions() {
        let marker = markertile_core::rasterize(Dictionary::DICT_4X4_50, 0, 0.06).unwrap();
        let rendered = render_marker_terminal(&marker.pattern);
        let lines: Vec<&str> = rendered.lines().collect();

        // 6 cells -> 3 half-block lines plus 2 + 2 quiet-zone lines
        assert_eq!(lines.len(), 7);
        for line in &lines {
            assert_eq!(line.chars().count(), 2 * (6 + 4));
        }
    }

    #[test]
    fn test_render_border_is_dark() {
        let marker = markertile_core::rasterize(Dictionary::DICT_5X5_50, 1, 0.07).unwrap();
        let rendered = render_marker_terminal(&marker.pattern);
        let lines: Vec<&str> = rendered.lines().collect();

        // First grid line: row 0 is all border, so every cell has a dark top half
        let first = lines[2].trim();
        assert!(first.starts_with("\u{2588}\u{2588}"));
        assert!(first.ends_with("\u{2588}\u{2588}"));
        assert!(!first.contains(' '));

        // 7 cells: the last line pairs the bottom border with padding
        let last = lines[5].trim();
        assert_eq!(last, "\u{2580}\u{2580}".repeat(7));
    }
}
