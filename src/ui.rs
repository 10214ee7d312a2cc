use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Padding, Paragraph, Wrap};

use crate::app::App;
use crate::switcher::{StatusLine, is_switchable};
use crate::theme::Theme;

const TEXT_PADDING: u16 = 1;
const STATUS_HEIGHT: u16 = 3;
const TITLE_BAR_HEIGHT: u16 = 3;
const ACTIVE_TITLE_BG: Color = Color::Rgb(90, 145, 200);
const ACTIVE_TITLE_FG: Color = Color::Black;
const FALLBACK_HELP_TEXT: &str = ": switch to buffer | k kill | q quit";

/// Columns available to the echo area once padding is taken off.
pub fn status_text_width(screen: Rect) -> u16 {
    let [_body, status] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)]).areas(screen);
    status.width.saturating_sub(TEXT_PADDING * 2).max(1)
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let [body, status] = Layout::vertical([Constraint::Min(0), Constraint::Length(STATUS_HEIGHT)])
        .areas(frame.area());
    let [buffer_area, list_area] =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(body);

    render_buffer_pane(frame, buffer_area, app, theme);
    render_buffer_list(frame, list_area, app, theme);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.echo_bg)),
        status,
    );
    let echo = Paragraph::new(echo_line(app, theme))
        .style(Style::default().bg(theme.echo_bg).fg(theme.muted_fg))
        .block(
            Block::default()
                .style(Style::default().bg(theme.echo_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        );
    frame.render_widget(echo, status);
}

fn render_buffer_pane(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let [title_area, content_area] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(area);
    let name = app
        .displayed_buffer()
        .map(|buffer| buffer.name.as_str())
        .unwrap_or_default();

    frame.render_widget(
        Paragraph::new(name)
            .style(Style::default().bg(ACTIVE_TITLE_BG).fg(ACTIVE_TITLE_FG))
            .block(
                Block::default()
                    .style(Style::default().bg(ACTIVE_TITLE_BG))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        title_area,
    );

    let contents = app
        .displayed_buffer()
        .map(|buffer| buffer.contents.as_str())
        .unwrap_or_default();
    frame.render_widget(
        Paragraph::new(contents)
            .wrap(Wrap { trim: false })
            .style(Style::default().bg(theme.buffer_bg).fg(theme.text_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.buffer_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        content_area,
    );
}

fn render_buffer_list(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let [title_area, content_area] =
        Layout::vertical([Constraint::Length(TITLE_BAR_HEIGHT), Constraint::Min(0)]).areas(area);

    frame.render_widget(
        Paragraph::new("Buffers")
            .style(Style::default().bg(theme.list_bg).fg(theme.muted_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.list_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        title_area,
    );

    frame.render_widget(
        Paragraph::new(buffer_list_lines(app, theme))
            .style(Style::default().bg(theme.list_bg).fg(theme.text_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.list_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        content_area,
    );
}

fn buffer_list_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let displayed = app.buffers().displayed();
    app.buffers()
        .iter()
        .map(|buffer| {
            let marker = if buffer.id == displayed { "> " } else { "  " };
            let style = if buffer.id == displayed {
                Style::default().fg(theme.active_fg).add_modifier(Modifier::BOLD)
            } else if is_switchable(&buffer.name) {
                Style::default().fg(theme.text_fg)
            } else {
                Style::default().fg(theme.muted_fg)
            };
            Line::from(vec![
                Span::styled(format!("{marker}{}", buffer.name), style),
                Span::styled(
                    format!("  #{}", buffer.last_shown),
                    Style::default().fg(theme.muted_fg),
                ),
            ])
        })
        .collect()
}

fn echo_line(app: &App, theme: &Theme) -> Line<'static> {
    if let Some(prompt) = app.prompt_text() {
        return Line::from(Span::styled(prompt, Style::default().fg(theme.active_fg)));
    }
    if let Some(status) = app.switch_status().filter(|status| !status.is_empty()) {
        return switch_status_line(status, theme);
    }
    if let Some(echo) = app.echo() {
        return Line::from(echo.to_string());
    }
    if app.key_hint().is_empty() {
        Line::from(FALLBACK_HELP_TEXT)
    } else {
        Line::from(format!("{} | {FALLBACK_HELP_TEXT}", app.key_hint()))
    }
}

fn switch_status_line(status: &StatusLine, theme: &Theme) -> Line<'static> {
    let spans: Vec<Span<'static>> = status
        .segments()
        .iter()
        .map(|segment| {
            let style = if segment.selected {
                Style::default()
                    .fg(theme.selection_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text_fg)
            };
            Span::styled(segment.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}
