//! Visual variants shared across components.

/// Button colour variant. Defaults to [`ButtonVariant::ZincOutline`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    /// Indigo fill.
    Indigo,
    /// Lime fill.
    Lime,
    /// Zinc fill.
    Zinc,
    /// Inverted zinc fill.
    ZincInverted,
    /// Zinc outline.
    #[default]
    ZincOutline,
}

impl ButtonVariant {
    /// All variants, in display order.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Indigo,
            Self::Lime,
            Self::Zinc,
            Self::ZincInverted,
            Self::ZincOutline,
        ]
    }

    /// Identifier used in `data-variant` attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Indigo => "indigo",
            Self::Lime => "lime",
            Self::Zinc => "zinc",
            Self::ZincInverted => "zinc-inverted",
            Self::ZincOutline => "zinc-outline",
        }
    }

    /// CSS class for the variant.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Indigo => "btn-indigo",
            Self::Lime => "btn-lime",
            Self::Zinc => "btn-zinc",
            Self::ZincInverted => "btn-zinc-inverted",
            Self::ZincOutline => "btn-zinc-outline",
        }
    }
}

/// Content layout of a button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonShape {
    /// Text label with optional icon.
    #[default]
    Text,
    /// Square icon-only button.
    Icon,
}

impl ButtonShape {
    /// CSS class for the shape.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Text => "btn-text",
            Self::Icon => "btn-icon",
        }
    }
}
