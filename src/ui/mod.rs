//! Terminal UI components
//!
//! Built with ratatui. [`render`] draws whichever screen the router is on,
//! plus the status bar and any notice popup.

pub mod auth;
pub mod browse;
pub mod detail;
pub mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::router::Route;

/// Main render function - dispatches to the screen for the current route
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    frame.render_widget(Clear, area);
    frame.render_widget(Block::default().style(Style::default().bg(Theme::BACKGROUND)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Screen
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let route = app.route();
    match route {
        Route::Landing => auth::render(frame, chunks[0], &app.auth),
        Route::Home => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(chunks[0]);
            let (initial, name, _) = app.profile_label();
            browse::render_header(
                frame,
                rows[0],
                &app.browse,
                app.input_mode == InputMode::Editing,
                &initial,
                &name,
            );
            browse::render(frame, rows[1], &app.browse);
        }
        Route::Movie(_) => detail::render(frame, chunks[0], &app.detail),
    }

    render_status_bar(frame, chunks[1], app, route);

    if let Some(notice) = &app.notice {
        render_notice_popup(frame, area, notice);
    }
}

/// Bottom line: route, signed-in user, key hints
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, route: Route) {
    let mode_indicator = match app.input_mode {
        InputMode::Normal => Span::styled(
            " NORMAL ",
            Style::default().fg(Theme::HIGHLIGHT).bg(Theme::PRIMARY),
        ),
        InputMode::Editing => Span::styled(
            " SEARCH ",
            Style::default().fg(Theme::BACKGROUND).bg(Theme::ACCENT),
        ),
    };

    let route_indicator = Span::styled(format!(" {} ", route.path()), Theme::dimmed());

    let user_indicator = if route.is_protected() {
        let (_, name, email) = app.profile_label();
        Span::styled(format!(" {} <{}> ", name, email), Theme::secondary())
    } else {
        Span::styled(" signed out ", Theme::dimmed())
    };

    let help = match route {
        Route::Landing => " ^L/^S/^F:mode  ^G:google  Tab:field  ↵:submit  Esc:quit ",
        Route::Home if app.input_mode == InputMode::Editing => " type to search  ↵/Esc:done ",
        Route::Home => " ←↑↓→:move  ↵:open  i:hero  /:search  1-4:tab  x:logout  q:quit ",
        Route::Movie(_) => " Esc:back  ↑↓:scroll  x:logout  q:quit ",
    };

    let status_line = Line::from(vec![
        mode_indicator,
        route_indicator,
        user_indicator,
        Span::raw(" │ "),
        Span::styled(help, Theme::dimmed()),
    ]);

    frame.render_widget(Paragraph::new(status_line).style(Theme::status_bar()), area);
}

/// Centered popup for failures without a screen of their own
fn render_notice_popup(frame: &mut Frame, area: Rect, notice: &str) {
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 5;

    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height.min(area.height),
    };

    frame.render_widget(Clear, popup_area);

    let popup = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(notice, Theme::error())),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Theme::error())
            .title(Span::styled(" ✗ ERROR ", Theme::error()))
            .style(Style::default().bg(Theme::BACKGROUND)),
    );

    frame.render_widget(popup, popup_area);
}

/// Shorten `s` to `max` characters, ending in `…` when cut
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Dune", 10), "Dune");
        assert_eq!(truncate("Blade Runner 2049", 8), "Blade R…");
        assert_eq!(truncate("abc", 0), "");
    }
}
