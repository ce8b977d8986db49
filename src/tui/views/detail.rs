//! Detail pane rendering: tab bar plus the info/events/logs content

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use super::super::app::{App, Focus, LogStatus, Pane};
use crate::kube::ResourceClient;
use crate::models::{PodEvent, Tab};

pub(super) fn render_tab_bar<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    let titles: Vec<Line> = Tab::ALL.iter().map(|t| Line::from(t.title())).collect();
    let selected = Tab::ALL.iter().position(|t| *t == app.tab).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(app.theme.tab_selected)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.theme.border_style(app.focus == Focus::Tabs)),
        );
    f.render_widget(tabs, area);
}

pub(super) fn render_content<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    match app.tab {
        Tab::Info => render_info(f, area, app),
        Tab::Events => render_events(f, area, app),
        Tab::Logs => render_logs(f, area, app),
    }
}

fn content_block<C: ResourceClient>(app: &App<C>, title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(app.focus == Focus::Content))
        .title(title)
}

fn render_info<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    let text = match &app.info {
        Pane::Empty => "No pod selected".to_string(),
        Pane::Loading => "Loading...".to_string(),
        Pane::Ready(yaml) => yaml.clone(),
        Pane::Error(reason) => format!("Failed to fetch pod info: {}", reason),
    };
    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((app.content_scroll, 0))
        .block(content_block(app, "Info".to_string()));
    f.render_widget(paragraph, area);
}

fn render_events<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    let block = content_block(app, "Events".to_string());
    match &app.events {
        Pane::Empty => {
            f.render_widget(Paragraph::new("No pod selected").block(block), area);
        }
        Pane::Loading => {
            f.render_widget(Paragraph::new("Loading...").block(block), area);
        }
        Pane::Error(reason) => {
            f.render_widget(
                Paragraph::new(format!("Failed to fetch events: {}", reason)).block(block),
                area,
            );
        }
        Pane::Ready(events) if events.is_empty() => {
            f.render_widget(Paragraph::new("No events").block(block), area);
        }
        Pane::Ready(events) => {
            let header = Row::new(["Reason", "Type", "Message", "Time"]).style(
                Style::default()
                    .fg(app.theme.text_label)
                    .add_modifier(Modifier::BOLD),
            );
            let rows: Vec<Row> = events.iter().map(|ev| event_row(app, ev)).collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Length(20),
                    Constraint::Length(8),
                    Constraint::Min(20),
                    Constraint::Length(20),
                ],
            )
            .header(header)
            .block(block);
            f.render_widget(table, area);
        }
    }
}

fn event_row<'a, C: ResourceClient>(app: &App<C>, event: &'a PodEvent) -> Row<'a> {
    let type_style = if event.is_normal() {
        Style::default()
    } else {
        Style::default().fg(app.theme.event_warning)
    };
    let time = event
        .creation_time
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default();
    Row::new(vec![
        Cell::from(event.reason.clone()),
        Cell::from(event.event_type.clone()).style(type_style),
        Cell::from(event.message.clone()),
        Cell::from(time),
    ])
}

fn render_logs<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    let title = match &app.log_status {
        LogStatus::Idle => "Logs".to_string(),
        LogStatus::Following => "Logs (following)".to_string(),
        LogStatus::Ended => "Logs (stream ended)".to_string(),
        LogStatus::Failed(reason) => format!("Logs (stream failed: {})", reason),
    };
    let block = content_block(app, title);

    // Tail the scrollback so the newest lines stay visible
    let visible = (area.height as usize).saturating_sub(2);
    let start = app.log_lines.len().saturating_sub(visible);
    let lines: Vec<Line> = app
        .log_lines
        .iter()
        .skip(start)
        .map(|l| Line::from(l.clone()))
        .collect();

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(block);
    f.render_widget(paragraph, area);
}
