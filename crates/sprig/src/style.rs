//! Appearance configuration, resolved per node with window-level fallback.

use crate::geom::Insets;

/// A sparse style. Unset fields fall back to the window's style, and from
/// there to fixed defaults; the font alone has no default and is required on
/// the window style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    /// Font name for text labels. Required at the window level.
    pub font: Option<String>,
    /// Color for text and control outlines.
    pub foreground: Option<u32>,
    /// Color for fills and backgrounds.
    pub background: Option<u32>,
    /// Foreground color while the node is the active responder.
    pub active_foreground: Option<u32>,
    /// Background color while the node is the active responder.
    pub active_background: Option<u32>,
    /// Corner radius for buttons and similar tappable controls.
    pub button_radius: Option<u32>,
    /// Corner radius for containers such as modal dialogs.
    pub container_radius: Option<u32>,
    /// Content insets from the top, right, bottom and left.
    pub insets: Option<Insets>,
}

impl Style {
    /// A style with only a font set.
    pub fn with_font(font: impl Into<String>) -> Self {
        Self {
            font: Some(font.into()),
            ..Self::default()
        }
    }
}

/// A fully-resolved style, handed to external render tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleValues {
    /// Font name.
    pub font: String,
    /// Foreground color.
    pub foreground: u32,
    /// Background color.
    pub background: u32,
    /// Active foreground color.
    pub active_foreground: u32,
    /// Active background color.
    pub active_background: u32,
    /// Button corner radius.
    pub button_radius: u32,
    /// Container corner radius.
    pub container_radius: u32,
    /// Content insets.
    pub insets: Insets,
}

pub(crate) fn resolve(node: Option<&Style>, window: &Style) -> StyleValues {
    let pick = |f: fn(&Style) -> Option<u32>, default: u32| {
        node.and_then(f).or_else(|| f(window)).unwrap_or(default)
    };
    StyleValues {
        // Window construction guarantees the fallback font is present.
        font: node
            .and_then(|s| s.font.clone())
            .or_else(|| window.font.clone())
            .unwrap_or_default(),
        foreground: pick(|s| s.foreground, 0xFF_FF_FF),
        background: pick(|s| s.background, 0x00_00_00),
        active_foreground: pick(|s| s.active_foreground, 0x00_00_00),
        active_background: pick(|s| s.active_background, 0xFF_FF_FF),
        button_radius: pick(|s| s.button_radius, 10),
        container_radius: pick(|s| s.container_radius, 5),
        insets: node
            .and_then(|s| s.insets)
            .or(window.insets)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_style_overrides_window_fallback() {
        let window = Style {
            font: Some("terminus".into()),
            foreground: Some(0x111111),
            button_radius: Some(4),
            ..Style::default()
        };
        let node = Style {
            foreground: Some(0x222222),
            ..Style::default()
        };
        let v = resolve(Some(&node), &window);
        assert_eq!(v.font, "terminus");
        assert_eq!(v.foreground, 0x222222);
        assert_eq!(v.button_radius, 4);
        // Unset everywhere falls through to the fixed default.
        assert_eq!(v.container_radius, 5);
    }

    #[test]
    fn defaults_without_node_style() {
        let window = Style::with_font("mono");
        let v = resolve(None, &window);
        assert_eq!(v.foreground, 0xFF_FF_FF);
        assert_eq!(v.background, 0);
        assert_eq!(v.insets, Insets::default());
    }
}
