//! View rendering

mod detail;
mod lists;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::app::App;
use crate::kube::ResourceClient;

/// Render the full frame: header, namespace/pod lists, tab bar, content, footer
pub fn render<C: ResourceClient>(f: &mut Frame, app: &App<C>) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, outer[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(outer[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(34), Constraint::Percentage(66)])
        .split(body[0]);

    lists::render_namespaces(f, left[0], app);
    lists::render_pods(f, left[1], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(body[1]);

    detail::render_tab_bar(f, right[0], app);
    detail::render_content(f, right[1], app);

    render_footer(f, outer[2], app);
}

fn render_header<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    let selection = app.controller.selection();
    let mut spans = vec![
        Span::styled("pod9s ", Style::default().fg(app.theme.title)),
        Span::styled("context: ", Style::default().fg(app.theme.text_label)),
        Span::raw(app.context.clone()),
    ];
    if let Some(ns) = &selection.namespace {
        spans.push(Span::styled(
            "  namespace: ",
            Style::default().fg(app.theme.text_label),
        ));
        spans.push(Span::raw(ns.clone()));
    }
    if let Some(pod) = &selection.pod {
        spans.push(Span::styled(
            "  pod: ",
            Style::default().fg(app.theme.text_label),
        ));
        spans.push(Span::raw(pod.clone()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_footer<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    if let Some(message) = &app.status_message {
        let line = Line::from(Span::styled(
            message.clone(),
            Style::default().fg(app.theme.status_error),
        ));
        f.render_widget(Paragraph::new(line), area);
        return;
    }

    let key = Style::default().fg(app.theme.footer_key);
    let text = Style::default().fg(app.theme.text_primary);
    let line = Line::from(vec![
        Span::styled("Enter", key),
        Span::styled(" forward  ", text),
        Span::styled("Backspace", key),
        Span::styled(" back  ", text),
        Span::styled("↑↓", key),
        Span::styled(" select  ", text),
        Span::styled("←→", key),
        Span::styled(" tab  ", text),
        Span::styled("q", key),
        Span::styled(" quit", text),
    ]);
    f.render_widget(Paragraph::new(line), area);
}
