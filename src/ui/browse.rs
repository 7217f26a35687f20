//! Browse screen: header, hero banner, and catalog rows
//!
//! Each row is a heading above a horizontal strip of cards. The strip
//! scrolls so the card under the cursor stays in view, and the row list
//! scrolls the same way vertically.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::browse::{BrowseState, RowView, Tab};
use crate::models::TitleSummary;
use crate::ui::{truncate, Theme};

const CARD_WIDTH: usize = 22;
const CARD_GAP: usize = 1;
const ROW_HEIGHT: u16 = 3;
const HERO_HEIGHT: u16 = 7;

// =============================================================================
// Header
// =============================================================================

pub fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &BrowseState,
    editing: bool,
    initial: &str,
    name: &str,
) {
    let profile_width = (name.chars().count() as u16 + 8).min(24);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(13),            // Logo
            Constraint::Min(10),               // Tabs
            Constraint::Length(34),            // Search box
            Constraint::Length(profile_width), // Profile
        ])
        .split(area);

    let logo = Paragraph::new(Line::from(Span::styled("MOVIEFLIX", Theme::logo())))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM).border_style(Theme::border()));
    frame.render_widget(logo, chunks[0]);

    let mut tabs = Vec::new();
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let style = if *tab == state.tab {
            Theme::tab_active()
        } else {
            Theme::tab_inactive()
        };
        tabs.push(Span::styled(format!("{}", i + 1), Theme::keybind()));
        tabs.push(Span::styled(format!(" {}  ", tab.label()), style));
    }
    let tabs = Paragraph::new(Line::from(tabs))
        .block(Block::default().borders(Borders::BOTTOM).border_style(Theme::border()));
    frame.render_widget(tabs, chunks[1]);

    let search_text = if editing {
        format!("⌕ {}│", state.search.query)
    } else if state.search.query.is_empty() {
        "⌕ Titles, people, genres".to_string()
    } else {
        format!("⌕ {}", state.search.query)
    };
    let search_box = Paragraph::new(search_text)
        .style(if editing {
            Theme::input()
        } else {
            Theme::dimmed()
        })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(if editing {
                    Theme::border_focused()
                } else {
                    Theme::border()
                }),
        );
    frame.render_widget(search_box, chunks[2]);

    let profile = Paragraph::new(Line::from(vec![
        Span::styled(format!(" {} ", initial), Theme::avatar()),
        Span::raw(" "),
        Span::styled(name.to_string(), Theme::secondary()),
    ]))
    .block(Block::default().borders(Borders::BOTTOM).border_style(Theme::border()));
    frame.render_widget(profile, chunks[3]);
}

// =============================================================================
// Body
// =============================================================================

pub fn render(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let rows_area = match (&state.hero, state.search.is_active()) {
        (Some(hero), false) if area.height > HERO_HEIGHT + ROW_HEIGHT => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(HERO_HEIGHT), Constraint::Min(1)])
                .split(area);
            render_hero(frame, chunks[0], hero);
            chunks[1]
        }
        _ => area,
    };

    render_rows(frame, rows_area, state);
}

fn render_hero(frame: &mut Frame, area: Rect, hero: &TitleSummary) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .style(Theme::card());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Keep the buttons visible: the overview gets whatever rows remain
    let overview_rows = inner.height.saturating_sub(3) as usize;
    let overview = truncate(&hero.overview, overview_rows * inner.width as usize);

    let lines = vec![
        Line::from(vec![
            Span::styled(hero.display_title().to_string(), Theme::title()),
            Span::raw("  "),
            Span::styled(format!("★ {:.1}", hero.vote_average), Theme::rating(hero.vote_average)),
        ]),
        Line::from(Span::styled(overview, Theme::secondary())),
        Line::from(""),
        Line::from(vec![
            Span::styled(" ▶ Play ", Theme::highlighted()),
            Span::raw("  "),
            Span::styled(" ⓘ More Info ", Theme::status_bar()),
            Span::styled(" [i]", Theme::keybind()),
        ]),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);
}

fn render_rows(frame: &mut Frame, area: Rect, state: &BrowseState) {
    let rows = state.visible_rows();
    if rows.is_empty() {
        return;
    }

    let fit = (area.height / ROW_HEIGHT).max(1) as usize;
    let (start, end) = window(state.row_cursor, fit, rows.len());

    for (slot, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: area.x,
            y: area.y + slot as u16 * ROW_HEIGHT,
            width: area.width,
            height: ROW_HEIGHT.min(area.height.saturating_sub(slot as u16 * ROW_HEIGHT)),
        };
        if row_area.height == 0 {
            break;
        }
        let cursor = (idx == state.row_cursor).then_some(state.item_cursor);
        render_row(frame, row_area, &rows[idx], cursor);
    }
}

fn render_row(frame: &mut Frame, area: Rect, row: &RowView<'_>, cursor: Option<usize>) {
    let heading_style = if cursor.is_some() {
        Theme::selected()
    } else {
        Theme::title()
    };
    let mut lines = vec![Line::from(Span::styled(format!(" {}", row.heading), heading_style))];

    if !row.loaded {
        lines.push(Line::from(Span::styled("  Loading...", Theme::loading())));
    } else if row.titles.is_empty() {
        lines.push(Line::from(Span::styled("  No titles", Theme::dimmed())));
    } else {
        let fit = (area.width as usize / (CARD_WIDTH + CARD_GAP)).max(1);
        let (start, end) = window(cursor.unwrap_or(0), fit, row.titles.len());
        let mut spans = vec![Span::raw(" ")];
        for idx in start..end {
            let selected = cursor == Some(idx);
            spans.push(card(row.titles[idx], selected));
            spans.push(Span::raw(" ".repeat(CARD_GAP)));
        }
        if end < row.titles.len() {
            spans.push(Span::styled("›", Theme::dimmed()));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

/// ` Title ★ 7.1 ` padded to the card width
fn card(title: &TitleSummary, selected: bool) -> Span<'static> {
    let rating = format!("★{:.1}", title.vote_average);
    let name_width = CARD_WIDTH.saturating_sub(rating.chars().count() + 3);
    let text = format!(
        " {:<width$} {} ",
        truncate(title.display_title(), name_width),
        rating,
        width = name_width
    );
    Span::styled(
        text,
        if selected {
            Theme::card_selected()
        } else {
            Theme::card()
        },
    )
}

/// Visible `[start, end)` of `len` items, `fit` at a time, keeping `cursor` in view
pub fn window(cursor: usize, fit: usize, len: usize) -> (usize, usize) {
    let fit = fit.max(1);
    let start = if cursor >= fit { cursor + 1 - fit } else { 0 };
    let start = start.min(len.saturating_sub(fit));
    (start, (start + fit).min(len))
}
