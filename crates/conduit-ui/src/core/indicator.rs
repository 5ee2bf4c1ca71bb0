//! Sliding selection indicator shared by toggle groups and nav bars.
//!
//! # Design
//! - One indicator element per group, never re-parented; only its frame
//!   changes, so a CSS transition carries it between options.
//! - Frames are measured relative to the group so scrolling the page does not
//!   move the indicator.

use crate::core::disclosure::TRANSITION_MS;
use crate::core::positioning::Rect;

/// Indicator box in the group's coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndicatorFrame {
    /// Offset from the group's left edge.
    pub left: i32,
    /// Offset from the group's top edge.
    pub top: i32,
    /// Width of the selected option.
    pub width: i32,
    /// Height of the selected option.
    pub height: i32,
}

impl IndicatorFrame {
    /// Frame covering `option`, given both boxes in viewport coordinates.
    #[must_use]
    pub const fn within(group: Rect, option: Rect) -> Self {
        Self {
            left: option.x - group.x,
            top: option.y - group.y,
            width: option.width,
            height: option.height,
        }
    }
}

/// Inline style for the indicator. Hidden until a selected option was
/// measured.
#[must_use]
pub fn indicator_styles(frame: Option<IndicatorFrame>) -> String {
    let base = "position: absolute; left: 0; top: 0; pointer-events: none;";
    match frame {
        Some(frame) => format!(
            "{base} width: {}px; height: {}px; transform: translate({}px, {}px); \
             transition: transform {TRANSITION_MS}ms, width {TRANSITION_MS}ms;",
            frame.width, frame.height, frame.left, frame.top
        ),
        None => format!("{base} opacity: 0;"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_relative_to_the_group() {
        let group = Rect {
            x: 100,
            y: 40,
            width: 300,
            height: 32,
        };
        let option = Rect {
            x: 180,
            y: 42,
            width: 64,
            height: 28,
        };
        assert_eq!(
            IndicatorFrame::within(group, option),
            IndicatorFrame {
                left: 80,
                top: 2,
                width: 64,
                height: 28,
            }
        );
    }

    #[test]
    fn styles_translate_the_single_indicator() {
        let styles = indicator_styles(Some(IndicatorFrame {
            left: 80,
            top: 2,
            width: 64,
            height: 28,
        }));
        assert!(styles.contains("transform: translate(80px, 2px)"));
        assert!(styles.contains("width: 64px"));
        assert!(styles.contains("transition: transform 150ms"));
        assert!(indicator_styles(None).contains("opacity: 0"));
    }
}
