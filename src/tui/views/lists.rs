//! Namespace and pod list rendering

use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use super::super::app::{App, Focus, NameList};
use crate::kube::ResourceClient;
use crate::tui::theme::Theme;

pub(super) fn render_namespaces<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    render_name_list(
        f,
        area,
        "Namespaces",
        &app.namespaces,
        app.focus == Focus::Namespaces,
        &app.theme,
    );
}

pub(super) fn render_pods<C: ResourceClient>(f: &mut Frame, area: Rect, app: &App<C>) {
    render_name_list(
        f,
        area,
        "Pods",
        &app.pods,
        app.focus == Focus::Pods,
        &app.theme,
    );
}

fn render_name_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    list: &NameList,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|name| ListItem::new(name.clone()))
        .collect();

    let widget = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style(focused))
                .title(title),
        )
        .highlight_style(theme.selected_style());

    let mut state = ListState::default();
    if !list.items.is_empty() {
        state.select(Some(list.selected));
    }
    f.render_stateful_widget(widget, area, &mut state);
}
