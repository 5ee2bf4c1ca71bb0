//! Anchored placement of floating surfaces.
//!
//! # Design
//! - Geometry is integer CSS pixels in viewport coordinates.
//! - Middleware runs as offset, flip, shift, then width matching.
//! - The view layer measures and subscribes to resize/scroll; this module only
//!   computes.

/// Side of the reference the surface sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// Above.
    Top,
    /// Below.
    Bottom,
    /// To the left.
    Left,
    /// To the right.
    Right,
}

impl Side {
    const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Alignment along the cross axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// Leading edges aligned.
    Start,
    /// Centred.
    Center,
    /// Trailing edges aligned.
    End,
}

/// Side plus alignment, e.g. `bottom-end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Main-axis side.
    pub side: Side,
    /// Cross-axis alignment.
    pub align: Align,
}

impl Placement {
    /// Below the reference, trailing edges aligned.
    pub const BOTTOM_END: Self = Self {
        side: Side::Bottom,
        align: Align::End,
    };

    /// Below the reference, centred.
    pub const BOTTOM: Self = Self {
        side: Side::Bottom,
        align: Align::Center,
    };

    /// Parse `side[-align]`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let (side, align) = value.split_once('-').unwrap_or((value, ""));
        let side = match side {
            "top" => Side::Top,
            "bottom" => Side::Bottom,
            "left" => Side::Left,
            "right" => Side::Right,
            _ => return None,
        };
        let align = match align {
            "" => Align::Center,
            "start" => Align::Start,
            "end" => Align::End,
            _ => return None,
        };
        Some(Self { side, align })
    }

    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match (self.side, self.align) {
            (Side::Top, Align::Start) => "top-start",
            (Side::Top, Align::Center) => "top",
            (Side::Top, Align::End) => "top-end",
            (Side::Bottom, Align::Start) => "bottom-start",
            (Side::Bottom, Align::Center) => "bottom",
            (Side::Bottom, Align::End) => "bottom-end",
            (Side::Left, Align::Start) => "left-start",
            (Side::Left, Align::Center) => "left",
            (Side::Left, Align::End) => "left-end",
            (Side::Right, Align::Start) => "right-start",
            (Side::Right, Align::Center) => "right",
            (Side::Right, Align::End) => "right-end",
        }
    }
}

/// Placement middleware settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionConfig {
    /// Preferred placement.
    pub placement: Placement,
    /// Gap between reference and surface.
    pub offset: i32,
    /// Minimum distance kept from viewport edges.
    pub padding: i32,
    /// Move to the opposite side when the preferred side overflows.
    pub flip: bool,
    /// Slide along the cross axis to stay inside the viewport.
    pub shift: bool,
    /// Surface is at least as wide as the reference.
    pub match_reference_width: bool,
}

impl PositionConfig {
    /// Menu defaults: `bottom-end`, 6 px offset, 6 px padding, width-matched.
    #[must_use]
    pub const fn menu() -> Self {
        Self {
            placement: Placement::BOTTOM_END,
            offset: 6,
            padding: 6,
            flip: true,
            shift: true,
            match_reference_width: true,
        }
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

/// Width and height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Size {
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

/// Computed surface position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FloatingPosition {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Placement after flipping.
    pub placement: Placement,
    /// Minimum width to apply, when width matching is on.
    pub min_width: Option<i32>,
}

impl FloatingPosition {
    /// Inline style for a fixed-position surface.
    #[must_use]
    pub fn styles(&self) -> String {
        let mut style = format!("position: fixed; left: {}px; top: {}px;", self.x, self.y);
        if let Some(width) = self.min_width {
            style.push_str(&format!(" min-width: {width}px;"));
        }
        style
    }
}

/// Computes surface coordinates for a reference box.
pub trait Positioning {
    /// Place a surface of `floating` size next to `reference`.
    fn compute(
        &self,
        config: &PositionConfig,
        reference: Rect,
        floating: Size,
        viewport: Size,
    ) -> FloatingPosition;
}

/// Default positioning with offset, flip, shift, and width matching.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AnchoredPositioning;

impl Positioning for AnchoredPositioning {
    fn compute(
        &self,
        config: &PositionConfig,
        reference: Rect,
        floating: Size,
        viewport: Size,
    ) -> FloatingPosition {
        let floating = if config.match_reference_width && config.placement.side.is_vertical() {
            Size {
                width: floating.width.max(reference.width),
                ..floating
            }
        } else {
            floating
        };

        let mut side = config.placement.side;
        if config.flip
            && overflows(side, reference, floating, viewport, config)
            && !overflows(side.opposite(), reference, floating, viewport, config)
        {
            side = side.opposite();
        }
        let placement = Placement {
            side,
            align: config.placement.align,
        };
        let (mut x, mut y) = place(placement, reference, floating, config.offset);

        if config.shift {
            if side.is_vertical() {
                x = clamp_axis(x, floating.width, viewport.width, config.padding);
            } else {
                y = clamp_axis(y, floating.height, viewport.height, config.padding);
            }
        }

        FloatingPosition {
            x,
            y,
            placement,
            min_width: config.match_reference_width.then_some(reference.width),
        }
    }
}

fn place(placement: Placement, reference: Rect, floating: Size, offset: i32) -> (i32, i32) {
    let cross = |start: i32, ref_len: i32, float_len: i32| match placement.align {
        Align::Start => start,
        Align::Center => start + (ref_len - float_len) / 2,
        Align::End => start + ref_len - float_len,
    };
    match placement.side {
        Side::Bottom => (
            cross(reference.x, reference.width, floating.width),
            reference.y + reference.height + offset,
        ),
        Side::Top => (
            cross(reference.x, reference.width, floating.width),
            reference.y - floating.height - offset,
        ),
        Side::Right => (
            reference.x + reference.width + offset,
            cross(reference.y, reference.height, floating.height),
        ),
        Side::Left => (
            reference.x - floating.width - offset,
            cross(reference.y, reference.height, floating.height),
        ),
    }
}

fn overflows(
    side: Side,
    reference: Rect,
    floating: Size,
    viewport: Size,
    config: &PositionConfig,
) -> bool {
    let pad = config.padding;
    let gap = config.offset;
    match side {
        Side::Bottom => reference.y + reference.height + gap + floating.height > viewport.height - pad,
        Side::Top => reference.y - gap - floating.height < pad,
        Side::Right => reference.x + reference.width + gap + floating.width > viewport.width - pad,
        Side::Left => reference.x - gap - floating.width < pad,
    }
}

fn clamp_axis(position: i32, length: i32, viewport: i32, padding: i32) -> i32 {
    let max = (viewport - padding - length).max(padding);
    position.clamp(padding, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Size = Size {
        width: 1_000,
        height: 800,
    };

    fn trigger_at(x: i32, y: i32) -> Rect {
        Rect {
            x,
            y,
            width: 120,
            height: 40,
        }
    }

    #[test]
    fn bottom_end_aligns_trailing_edges_below_offset() {
        let position = AnchoredPositioning.compute(
            &PositionConfig::menu(),
            trigger_at(500, 100),
            Size {
                width: 200,
                height: 150,
            },
            VIEWPORT,
        );
        assert_eq!(position.placement, Placement::BOTTOM_END);
        assert_eq!(position.x, 500 + 120 - 200);
        assert_eq!(position.y, 146);
        assert_eq!(position.min_width, Some(120));
    }

    #[test]
    fn surface_is_at_least_trigger_width() {
        let position = AnchoredPositioning.compute(
            &PositionConfig::menu(),
            trigger_at(500, 100),
            Size {
                width: 80,
                height: 100,
            },
            VIEWPORT,
        );
        assert_eq!(position.x, 500);
        assert!(position.styles().contains("min-width: 120px"));
    }

    #[test]
    fn flips_above_when_bottom_overflows() {
        let position = AnchoredPositioning.compute(
            &PositionConfig::menu(),
            trigger_at(500, 700),
            Size {
                width: 200,
                height: 150,
            },
            VIEWPORT,
        );
        assert_eq!(position.placement.side, Side::Top);
        assert_eq!(position.y, 700 - 150 - 6);
    }

    #[test]
    fn shifts_inside_viewport_padding() {
        let position = AnchoredPositioning.compute(
            &PositionConfig::menu(),
            trigger_at(10, 100),
            Size {
                width: 300,
                height: 100,
            },
            VIEWPORT,
        );
        assert_eq!(position.x, 6);
    }

    #[test]
    fn placements_round_trip_through_strings() {
        assert_eq!(Placement::parse("bottom-end"), Some(Placement::BOTTOM_END));
        assert_eq!(Placement::parse("bottom"), Some(Placement::BOTTOM));
        assert_eq!(Placement::parse("middle"), None);
        assert_eq!(Placement::BOTTOM_END.as_str(), "bottom-end");
    }
}
