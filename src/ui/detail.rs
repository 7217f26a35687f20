//! Detail screen for a single title

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::detail::{DetailState, DetailStatus};
use crate::models::TitleDetail;
use crate::ui::Theme;

pub fn render(frame: &mut Frame, area: Rect, state: &DetailState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border())
        .title(Span::styled(" ← Back [Esc] ", Theme::keybind()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match &state.status {
        DetailStatus::Loading => {
            let loading = Paragraph::new("Loading...")
                .style(Theme::loading())
                .alignment(Alignment::Center);
            frame.render_widget(loading, inner);
        }
        DetailStatus::NotFound => {
            let missing = Paragraph::new("Movie not found")
                .style(Theme::error())
                .alignment(Alignment::Center);
            frame.render_widget(missing, inner);
        }
        DetailStatus::Loaded(detail) => {
            let info = Paragraph::new(detail_lines(detail))
                .wrap(Wrap { trim: true })
                .scroll((state.scroll, 0));
            frame.render_widget(info, inner);
        }
    }
}

/// Title, meta line, overview, genres, actions
pub fn detail_lines(detail: &TitleDetail) -> Vec<Line<'static>> {
    let mut meta = vec![
        Span::styled(format!("★ {:.1}", detail.vote_average), Theme::accent()),
        Span::raw("   "),
    ];
    if let Some(year) = detail.release_year() {
        meta.push(Span::styled(year.to_string(), Theme::year()));
        meta.push(Span::raw("   "));
    }
    if let Some(runtime) = detail.runtime {
        meta.push(Span::styled(format!("{} min", runtime), Theme::duration()));
        meta.push(Span::raw("   "));
    }
    meta.push(Span::styled(format!(" {} ", detail.audience_badge()), Theme::badge()));

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(detail.title.clone(), Theme::logo())),
        Line::from(""),
        Line::from(meta),
        Line::from(""),
        Line::from(Span::styled(detail.overview.clone(), Theme::text())),
        Line::from(""),
    ];

    if !detail.genres.is_empty() {
        lines.push(Line::from(Span::styled(detail.genres_str(), Theme::genre())));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(" ▶ Play ", Theme::highlighted()),
        Span::raw("  "),
        Span::styled(" + My List ", Theme::status_bar()),
    ]));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_lines_include_meta() {
        let detail: TitleDetail = serde_json::from_value(serde_json::json!({
            "id": 42,
            "title": "Hitchhiker",
            "release_date": "2005-04-28",
            "runtime": 109,
            "adult": true,
            "vote_average": 6.8,
            "genres": [{"id": 35, "name": "Comedy"}]
        }))
        .unwrap();

        let text: String = detail_lines(&detail)
            .iter()
            .flat_map(|l| l.spans.iter().map(|s| s.content.to_string()))
            .collect();
        assert!(text.contains("★ 6.8"));
        assert!(text.contains("2005"));
        assert!(text.contains("109 min"));
        assert!(text.contains("18+"));
        assert!(text.contains("Comedy"));
    }
}
