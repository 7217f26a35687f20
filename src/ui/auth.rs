//! Landing screen: sign in, sign up, forgot password

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::auth::{AuthMode, AuthScreen, Field};
use crate::ui::Theme;

const CARD_WIDTH: u16 = 52;
const MASK: char = '•';

pub fn render(frame: &mut Frame, area: Rect, screen: &AuthScreen) {
    let lines = card_lines(screen);

    let width = CARD_WIDTH.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let card = Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" MOVIEFLIX ", Theme::logo()))
        .title_alignment(Alignment::Center)
        .style(Theme::text());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, card);
}

/// Everything inside the card, top to bottom
pub fn card_lines(screen: &AuthScreen) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if screen.mode != AuthMode::Forgot {
        let tab = |label: &'static str, active: bool| {
            Span::styled(
                format!(" {} ", label),
                if active {
                    Theme::tab_active()
                } else {
                    Theme::tab_inactive()
                },
            )
        };
        lines.push(
            Line::from(vec![
                tab("Sign In", screen.mode == AuthMode::Login),
                Span::styled("│", Theme::dimmed()),
                tab("Sign Up", screen.mode == AuthMode::Signup),
            ])
            .alignment(Alignment::Center),
        );
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(" {}", screen.mode.heading()),
        Theme::title(),
    )));

    if let Some(error) = &screen.error {
        lines.push(Line::from(Span::styled(format!(" ✗ {}", error), Theme::error())));
    }
    if let Some(message) = &screen.message {
        lines.push(Line::from(Span::styled(format!(" ✓ {}", message), Theme::success())));
    }
    lines.push(Line::from(""));

    let focused = screen.focused_field();
    let prompt_open = screen.social_input.is_some();
    for field in screen.mode.visible_fields() {
        let is_focused = *field == focused && !prompt_open;
        lines.push(field_label(*field, is_focused));
        lines.push(field_value(screen.form.value(*field), field.is_secret(), is_focused));
    }

    lines.push(Line::from(""));
    let submit = if screen.loading {
        "Processing...".to_string()
    } else {
        screen.mode.submit_label().to_string()
    };
    lines.push(
        Line::from(Span::styled(
            format!("  {}  ", submit),
            if screen.loading {
                Theme::loading()
            } else {
                Theme::highlighted()
            },
        ))
        .alignment(Alignment::Center),
    );

    match screen.mode {
        AuthMode::Login => {
            lines.push(hint("Forgot Password?", "^F"));
            lines.push(Line::from(Span::styled("── OR ──", Theme::dimmed())).alignment(Alignment::Center));
            match &screen.social_input {
                Some(token) => {
                    lines.push(Line::from(Span::styled(" Google ID token", Theme::accent())));
                    lines.push(field_value(token, false, true));
                    lines.push(hint("Submit", "↵"));
                }
                None => lines.push(hint("Sign in with Google", "^G")),
            }
        }
        AuthMode::Signup => lines.push(hint("Already have an account? Sign In", "^L")),
        AuthMode::Forgot => lines.push(hint("Back to Sign In", "^L")),
    }

    lines
}

fn field_label(field: Field, focused: bool) -> Line<'static> {
    let marker = if focused { "▸" } else { " " };
    let optional = if field.is_required() { "" } else { " (optional)" };
    Line::from(vec![
        Span::styled(marker, Theme::logo()),
        Span::styled(
            format!("{}{}", field.label(), optional),
            if focused { Theme::selected() } else { Theme::dimmed() },
        ),
    ])
}

fn field_value(value: &str, secret: bool, focused: bool) -> Line<'static> {
    let shown: String = if secret {
        std::iter::repeat(MASK).take(value.chars().count()).collect()
    } else {
        value.to_string()
    };
    let cursor = if focused { "│" } else { "" };
    Line::from(Span::styled(format!("  {}{}", shown, cursor), Theme::input()))
}

fn hint(label: &'static str, key: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Theme::secondary()),
        Span::raw(" "),
        Span::styled(format!("[{}]", key), Theme::keybind()),
    ])
    .alignment(Alignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_password_is_masked() {
        let mut screen = AuthScreen::default();
        screen.form.username = "alice".into();
        screen.form.password = "hunter2".into();
        let rendered = text(&card_lines(&screen));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("•••••••"));
    }

    #[test]
    fn test_loading_label() {
        let mut screen = AuthScreen::default();
        screen.loading = true;
        assert!(text(&card_lines(&screen)).contains("Processing..."));
    }

    #[test]
    fn test_forgot_mode_hides_tabs_and_social() {
        let mut screen = AuthScreen::default();
        screen.set_mode(AuthMode::Forgot);
        let rendered = text(&card_lines(&screen));
        assert!(!rendered.contains("Sign Up"));
        assert!(!rendered.contains("Google"));
        assert!(rendered.contains("Send Reset Link"));
        assert!(rendered.contains("Email"));
    }

    #[test]
    fn test_mobile_marked_optional() {
        let mut screen = AuthScreen::default();
        screen.set_mode(AuthMode::Signup);
        assert!(text(&card_lines(&screen)).contains("Mobile Number (optional)"));
    }
}
