//! Movieflix theme
//!
//! Color palette and style helpers for the TUI: near-black background,
//! signature red for branding and focus, gold for ratings.

use ratatui::style::{Color, Modifier, Style};

/// Movieflix color palette
pub struct Theme;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // CORE PALETTE
    // ═══════════════════════════════════════════════════════════════════════

    /// Background: #141414
    pub const BACKGROUND: Color = Color::Rgb(0x14, 0x14, 0x14);

    /// Primary: #e50914 (brand red)
    pub const PRIMARY: Color = Color::Rgb(0xe5, 0x09, 0x14);

    /// Secondary: #b3b3b3 (light grey)
    pub const SECONDARY: Color = Color::Rgb(0xb3, 0xb3, 0xb3);

    /// Accent: #f5c518 (rating gold)
    pub const ACCENT: Color = Color::Rgb(0xf5, 0xc5, 0x18);

    /// Highlight: #ffffff (selected card)
    pub const HIGHLIGHT: Color = Color::Rgb(0xff, 0xff, 0xff);

    /// Text: #e5e5e5
    pub const TEXT: Color = Color::Rgb(0xe5, 0xe5, 0xe5);

    /// Dim: #808080
    pub const DIM: Color = Color::Rgb(0x80, 0x80, 0x80);

    /// Success: #46d369
    pub const SUCCESS: Color = Color::Rgb(0x46, 0xd3, 0x69);

    /// Warning: #e87c03
    pub const WARNING: Color = Color::Rgb(0xe8, 0x7c, 0x03);

    /// Error: #ff5c5c
    pub const ERROR: Color = Color::Rgb(0xff, 0x5c, 0x5c);

    // ═══════════════════════════════════════════════════════════════════════
    // DERIVED COLORS
    // ═══════════════════════════════════════════════════════════════════════

    /// Panels, cards and input fields
    pub const BACKGROUND_LIGHT: Color = Color::Rgb(0x23, 0x23, 0x23);

    pub const BORDER: Color = Color::Rgb(0x3a, 0x3a, 0x3a);

    pub const BORDER_FOCUSED: Color = Self::PRIMARY;

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND)
    }

    /// White on red, for the focused card and primary buttons
    pub fn highlighted() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed() -> Style {
        Style::default().fg(Self::DIM)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Self::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success() -> Style {
        Style::default()
            .fg(Self::SUCCESS)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning() -> Style {
        Style::default()
            .fg(Self::WARNING)
            .add_modifier(Modifier::BOLD)
    }

    /// Section and block titles
    pub fn title() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD)
    }

    /// The MOVIEFLIX wordmark
    pub fn logo() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn accent() -> Style {
        Style::default()
            .fg(Self::ACCENT)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    pub fn border_focused() -> Style {
        Style::default()
            .fg(Self::BORDER_FOCUSED)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    /// Active navigation tab
    pub fn tab_active() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn tab_inactive() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    /// Poster card in a row
    pub fn card() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Poster card under the cursor
    pub fn card_selected() -> Style {
        Self::highlighted()
    }

    pub fn input() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Keybinding hint style
    pub fn keybind() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Self::TEXT).bg(Self::BACKGROUND_LIGHT)
    }

    /// Profile avatar initial
    pub fn avatar() -> Style {
        Style::default()
            .fg(Self::HIGHLIGHT)
            .bg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    /// "Loading..." and "Processing..." indicators
    pub fn loading() -> Style {
        Style::default()
            .fg(Self::SECONDARY)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn year() -> Style {
        Style::default().fg(Self::SUCCESS)
    }

    pub fn genre() -> Style {
        Style::default().fg(Self::SECONDARY)
    }

    pub fn duration() -> Style {
        Style::default().fg(Self::DIM)
    }

    /// Audience badge (13+ / 18+)
    pub fn badge() -> Style {
        Style::default()
            .fg(Self::TEXT)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }

    /// Rating color by score
    pub fn rating(score: f32) -> Style {
        if score >= 7.5 {
            Style::default().fg(Self::SUCCESS)
        } else if score >= 6.0 {
            Style::default().fg(Self::ACCENT)
        } else if score > 0.0 {
            Style::default().fg(Self::WARNING)
        } else {
            Self::dimmed()
        }
    }
}

/// WCAG contrast ratio between two RGB colors, from 1 to 21.
/// `None` for palette-indexed or named colors.
pub fn contrast(fg: Color, bg: Color) -> Option<f64> {
    let (a, b) = (luminance(fg)?, luminance(bg)?);
    let (hi, lo) = if a >= b { (a, b) } else { (b, a) };
    Some((hi + 0.05) / (lo + 0.05))
}

/// Normal text needs 4.5:1, bold or large text 3:1
pub fn readable(fg: Color, bg: Color, large: bool) -> bool {
    let min = if large { 3.0 } else { 4.5 };
    contrast(fg, bg).is_some_and(|ratio| ratio >= min)
}

// sRGB relative luminance
fn luminance(color: Color) -> Option<f64> {
    let Color::Rgb(r, g, b) = color else {
        return None;
    };
    let linear = |c: u8| {
        let c = f64::from(c) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Some(0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b))
}
