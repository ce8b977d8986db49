//! Application state and input handling
//!
//! The App owns the controller instance (dependency-injected, not ambient
//! state) and mirrors whatever the controller last delivered. All collaborator
//! I/O happens behind the controller; this module only moves cursors, applies
//! polled results, and dispatches keys.

use std::collections::VecDeque;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::theme::Theme;
use crate::controller::ScopeManager;
use crate::kube::ResourceClient;
use crate::models::{FetchResult, LogEvent, PodEvent, Tab};

/// Lines of log scrollback kept in the view
pub(crate) const MAX_LOG_SCROLLBACK: usize = 2000;

/// Upper bound on log events applied per render tick
pub(crate) const MAX_LOG_EVENTS_PER_TICK: usize = 256;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Focus {
    Namespaces,
    Pods,
    Tabs,
    Content,
}

/// A list of names plus the cursor position within it
#[derive(Default)]
pub struct NameList {
    pub items: Vec<String>,
    pub selected: usize,
}

impl NameList {
    pub fn current(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    /// Move the cursor; returns true when the selection actually changed
    fn step(&mut self, down: bool) -> bool {
        if self.items.is_empty() {
            return false;
        }
        let before = self.selected;
        if down {
            self.selected = (self.selected + 1).min(self.items.len() - 1);
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
        self.selected != before
    }

    fn reset(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected = 0;
    }

    fn clear(&mut self) {
        self.items.clear();
        self.selected = 0;
    }
}

/// Content of a detail pane
pub enum Pane<T> {
    Empty,
    Loading,
    Ready(T),
    Error(String),
}

/// Where the current log follower stands
#[derive(Clone, PartialEq, Debug)]
pub enum LogStatus {
    Idle,
    Following,
    Ended,
    Failed(String),
}

pub struct App<C: ResourceClient> {
    pub(crate) controller: ScopeManager<C>,
    pub(crate) context: String,
    pub(crate) theme: Theme,

    pub(crate) focus: Focus,
    pub(crate) namespaces: NameList,
    pub(crate) pods: NameList,
    pub(crate) tab: Tab,

    pub(crate) info: Pane<String>,
    pub(crate) events: Pane<Vec<PodEvent>>,
    pub(crate) log_lines: VecDeque<String>,
    pub(crate) log_status: LogStatus,
    pub(crate) content_scroll: u16,

    pub(crate) status_message: Option<String>,
}

impl<C: ResourceClient> App<C> {
    pub fn new(mut controller: ScopeManager<C>, context: String, theme: Theme) -> Self {
        controller.load_namespaces();
        Self {
            controller,
            context,
            theme,
            focus: Focus::Namespaces,
            namespaces: NameList::default(),
            pods: NameList::default(),
            tab: Tab::default(),
            info: Pane::Empty,
            events: Pane::Empty,
            log_lines: VecDeque::new(),
            log_status: LogStatus::Idle,
            content_scroll: 0,
            status_message: None,
        }
    }

    /// Pull everything the controller has ready this tick
    pub fn poll_controller(&mut self) {
        if let Some(result) = self.controller.poll_namespaces() {
            self.apply_namespaces(result);
        }
        if let Some(result) = self.controller.poll_pods() {
            self.apply_pods(result);
        }
        if let Some(result) = self.controller.poll_info() {
            self.apply_info(result);
        }
        if let Some(result) = self.controller.poll_events() {
            self.apply_events(result);
        }
        for event in self.controller.drain_log_events(MAX_LOG_EVENTS_PER_TICK) {
            self.apply_log_event(event);
        }
    }

    fn apply_namespaces(&mut self, result: FetchResult<Vec<String>>) {
        match result {
            FetchResult::Ok(names) => {
                self.namespaces.reset(names);
                // Mirror the list widget's initial highlight: the first
                // namespace becomes the active selection
                if let Some(first) = self.namespaces.current().map(str::to_string) {
                    self.activate_namespace(&first);
                }
            }
            FetchResult::Err(reason) => {
                self.status_message = Some(format!("Failed to list namespaces: {}", reason));
            }
            FetchResult::Cancelled => {}
        }
    }

    fn apply_pods(&mut self, result: FetchResult<Vec<String>>) {
        match result {
            FetchResult::Ok(names) => {
                self.pods.reset(names);
                if let Some(first) = self.pods.current().map(str::to_string) {
                    self.activate_pod(&first);
                }
            }
            FetchResult::Err(reason) => {
                self.pods.clear();
                self.status_message = Some(format!("Failed to list pods: {}", reason));
            }
            FetchResult::Cancelled => {}
        }
    }

    fn apply_info(&mut self, result: FetchResult<crate::models::PodInfo>) {
        self.info = match result {
            FetchResult::Ok(info) => match serde_yaml::to_string(&info) {
                Ok(text) => Pane::Ready(text),
                Err(e) => Pane::Error(e.to_string()),
            },
            FetchResult::Err(reason) => Pane::Error(reason),
            FetchResult::Cancelled => return,
        };
    }

    fn apply_events(&mut self, result: FetchResult<Vec<PodEvent>>) {
        self.events = match result {
            FetchResult::Ok(events) => Pane::Ready(events),
            FetchResult::Err(reason) => Pane::Error(reason),
            FetchResult::Cancelled => return,
        };
    }

    fn apply_log_event(&mut self, event: LogEvent) {
        match event {
            LogEvent::Line(line) => {
                if self.log_lines.len() >= MAX_LOG_SCROLLBACK {
                    self.log_lines.pop_front();
                }
                self.log_lines.push_back(line.text);
            }
            LogEvent::Ended => self.log_status = LogStatus::Ended,
            LogEvent::Failed(reason) => self.log_status = LogStatus::Failed(reason),
        }
    }

    /// Main keyboard handler; returns true to quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        match key.code {
            KeyCode::Char('q') => return true,
            KeyCode::Enter => self.focus_forward(),
            KeyCode::Backspace => self.focus_back(),
            KeyCode::Up => self.on_up(),
            KeyCode::Down => self.on_down(),
            KeyCode::Left if self.focus == Focus::Tabs => self.switch_tab(self.tab.prev()),
            KeyCode::Right if self.focus == Focus::Tabs => self.switch_tab(self.tab.next()),
            _ => {}
        }
        false
    }

    fn focus_forward(&mut self) {
        self.focus = match self.focus {
            Focus::Namespaces => Focus::Pods,
            Focus::Pods => Focus::Tabs,
            Focus::Tabs => Focus::Content,
            Focus::Content => Focus::Namespaces,
        };
    }

    fn focus_back(&mut self) {
        self.focus = match self.focus {
            Focus::Namespaces => Focus::Content,
            Focus::Pods => Focus::Namespaces,
            Focus::Tabs => Focus::Pods,
            Focus::Content => Focus::Tabs,
        };
    }

    fn on_up(&mut self) {
        match self.focus {
            Focus::Namespaces => {
                if self.namespaces.step(false) {
                    if let Some(ns) = self.namespaces.current().map(str::to_string) {
                        self.activate_namespace(&ns);
                    }
                }
            }
            Focus::Pods => {
                if self.pods.step(false) {
                    if let Some(pod) = self.pods.current().map(str::to_string) {
                        self.activate_pod(&pod);
                    }
                }
            }
            Focus::Tabs => {}
            Focus::Content => self.content_scroll = self.content_scroll.saturating_sub(1),
        }
    }

    fn on_down(&mut self) {
        match self.focus {
            Focus::Namespaces => {
                if self.namespaces.step(true) {
                    if let Some(ns) = self.namespaces.current().map(str::to_string) {
                        self.activate_namespace(&ns);
                    }
                }
            }
            Focus::Pods => {
                if self.pods.step(true) {
                    if let Some(pod) = self.pods.current().map(str::to_string) {
                        self.activate_pod(&pod);
                    }
                }
            }
            Focus::Tabs => {}
            Focus::Content => self.content_scroll = self.content_scroll.saturating_add(1),
        }
    }

    fn activate_namespace(&mut self, namespace: &str) {
        self.controller.select_namespace(namespace);
        self.pods.clear();
        self.clear_panes();
    }

    fn activate_pod(&mut self, pod: &str) {
        self.clear_panes();
        if self.controller.select_pod(pod).is_err() {
            return;
        }
        // Pod selection alone starts nothing; re-apply the current tab
        self.start_tab(self.tab);
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.clear_panes();
        self.start_tab(tab);
    }

    fn start_tab(&mut self, tab: Tab) {
        match self.controller.select_tab(tab) {
            Ok(()) => {
                match tab {
                    Tab::Info => self.info = Pane::Loading,
                    Tab::Events => self.events = Pane::Loading,
                    Tab::Logs => self.log_status = LogStatus::Following,
                }
            }
            // No pod selected yet; the pane stays empty until one is
            Err(_) => {}
        }
    }

    fn clear_panes(&mut self) {
        self.info = Pane::Empty;
        self.events = Pane::Empty;
        self.log_lines.clear();
        self.log_status = LogStatus::Idle;
        self.content_scroll = 0;
    }
}
