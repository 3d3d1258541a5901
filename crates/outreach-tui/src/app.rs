use std::future::Future;

use outreach_core::{
    next_connection_status, DraftField, Notice, SharedState, SyncOrchestrator, Tab, ViewState,
};
use ratatui::widgets::ListState;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing, // New-target form has the keyboard
}

pub struct App {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub backend_url: String,

    // New-target form
    pub form_field: DraftField,

    // List selections
    pub target_list: ListState,
    pub message_list: ListState,
    pub post_list: ListState,

    /// Result of the last finished action, shown as a popup until a key is pressed.
    pub notice: Option<Notice>,
    pub animation_frame: u8, // 0-2 for ellipsis animation

    state: SharedState,
    sync: SyncOrchestrator,
    tasks: Vec<JoinHandle<Option<Notice>>>,
    // The one create/generate/update action allowed in flight
    mutating: Option<JoinHandle<Option<Notice>>>,
}

impl App {
    pub fn new(sync: SyncOrchestrator, backend_url: String) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            backend_url,
            form_field: DraftField::default(),
            target_list: ListState::default(),
            message_list: ListState::default(),
            post_list: ListState::default(),
            notice: None,
            animation_frame: 0,
            state: sync.state().clone(),
            sync,
            tasks: Vec::new(),
            mutating: None,
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state.read(|s| s.busy)
    }

    pub fn active_tab(&self) -> Tab {
        self.state.read(|s| s.active_tab)
    }

    #[cfg(test)]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len() + usize::from(self.mutating.is_some())
    }

    fn spawn<F, Fut>(&mut self, action: F)
    where
        F: FnOnce(SyncOrchestrator) -> Fut,
        Fut: Future<Output = Option<Notice>> + Send + 'static,
    {
        self.tasks.push(tokio::spawn(action(self.sync.clone())));
    }

    fn spawn_mutating<F, Fut>(&mut self, action: F)
    where
        F: FnOnce(SyncOrchestrator) -> Fut,
        Fut: Future<Output = Option<Notice>> + Send + 'static,
    {
        // A finished but unharvested action still owes its notice
        if let Some(done) = self.mutating.take() {
            self.tasks.push(done);
        }
        self.mutating = Some(tokio::spawn(action(self.sync.clone())));
    }

    /// Only one mutating action runs at a time. The spawned task sets `busy` once
    /// it starts, so the handle covers the gap before that.
    fn refuse_while_busy(&self, action: &str) -> bool {
        let in_flight = self
            .mutating
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());
        let busy = in_flight || self.is_busy();
        if busy {
            tracing::debug!(action, "busy, ignoring");
        }
        busy
    }

    /// Harvest notices from actions that have completed.
    pub async fn collect_finished_tasks(&mut self) {
        if self.mutating.as_ref().is_some_and(|handle| handle.is_finished()) {
            self.tasks.extend(self.mutating.take());
        }

        let (finished, running): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|handle| handle.is_finished());
        self.tasks = running;

        for handle in finished {
            match handle.await {
                Ok(Some(notice)) => self.notice = Some(notice),
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("action task failed: {}", e);
                    self.notice = Some(Notice::error("The action stopped unexpectedly"));
                }
            }
        }
    }

    // Data loading

    pub fn start_bootstrap(&mut self) {
        self.spawn(|sync| async move {
            sync.bootstrap().await;
            None
        });
    }

    pub fn refresh(&mut self) {
        self.spawn(|sync| async move {
            sync.refresh().await;
            None
        });
    }

    pub fn test_connections(&mut self) {
        self.spawn(|sync| async move { Some(sync.test_connections().await) });
    }

    // Tabs

    pub fn select_tab(&mut self, tab: Tab) {
        self.input_mode = InputMode::Normal;
        self.state.update(|s| s.set_tab(tab));
    }

    pub fn next_tab(&mut self) {
        self.select_tab(self.active_tab().next());
    }

    pub fn prev_tab(&mut self) {
        self.select_tab(self.active_tab().prev());
    }

    // New-target form

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn next_form_field(&mut self) {
        self.form_field = self.form_field.next();
    }

    pub fn prev_form_field(&mut self) {
        self.form_field = self.form_field.prev();
    }

    pub fn form_push(&mut self, c: char) {
        let field = self.form_field;
        self.state.update(|s| {
            let mut value = s.new_target.get(field).to_string();
            value.push(c);
            s.set_draft_field(field, value);
        });
    }

    pub fn form_backspace(&mut self) {
        let field = self.form_field;
        self.state.update(|s| {
            let mut value = s.new_target.get(field).to_string();
            value.pop();
            s.set_draft_field(field, value);
        });
    }

    pub fn submit_target(&mut self) {
        if self.refuse_while_busy("create target") {
            return;
        }
        self.input_mode = InputMode::Normal;
        self.form_field = DraftField::default();
        self.spawn_mutating(|sync| async move { sync.create_target().await });
    }

    // Targets list

    fn selected_target(&self) -> Option<(String, String)> {
        let index = self.target_list.selected()?;
        self.state.read(|s| {
            s.targets
                .get(index)
                .map(|t| (t.id.clone(), t.connection_status.clone()))
        })
    }

    pub fn generate_for_selected(&mut self) {
        if self.refuse_while_busy("generate message") {
            return;
        }
        let Some((target_id, _)) = self.selected_target() else {
            return;
        };
        self.spawn_mutating(move |sync| async move { sync.generate_message(&target_id).await });
    }

    pub fn cycle_selected_status(&mut self) {
        if self.refuse_while_busy("update status") {
            return;
        }
        let Some((target_id, status)) = self.selected_target() else {
            return;
        };
        let next = next_connection_status(&status);
        self.spawn_mutating(move |sync| async move {
            sync.update_connection_status(&target_id, next).await
        });
    }

    // Generation settings

    pub fn cycle_message_type(&mut self) {
        self.state.update(|s| {
            let next = s.message_config.message_type.next();
            s.set_message_type(next);
        });
    }

    pub fn cycle_provider(&mut self) {
        self.state.update(|s| {
            let next = s.message_config.llm_provider.next();
            s.set_llm_provider(next);
        });
    }

    // Posts

    pub fn generate_post(&mut self) {
        if self.refuse_while_busy("generate post") {
            return;
        }
        self.spawn_mutating(|sync| async move { sync.generate_viral_post().await });
    }

    // List navigation for whichever list the active tab shows

    pub fn list_down(&mut self) {
        let tab = self.active_tab();
        let len = self.state.read(|s| list_len(s, tab));
        if let Some(list) = self.list_for(tab) {
            select_next(list, len);
        }
    }

    pub fn list_up(&mut self) {
        let tab = self.active_tab();
        if let Some(list) = self.list_for(tab) {
            select_prev(list);
        }
    }

    fn list_for(&mut self, tab: Tab) -> Option<&mut ListState> {
        match tab {
            Tab::Overview => None,
            Tab::Targets => Some(&mut self.target_list),
            Tab::Messages => Some(&mut self.message_list),
            Tab::Posts => Some(&mut self.post_list),
        }
    }

    /// Keep selections inside their lists after a re-fetch shrinks them.
    pub fn clamp_selections(&mut self, view: &ViewState) {
        clamp(&mut self.target_list, view.targets.len());
        clamp(&mut self.message_list, view.messages.len());
        clamp(&mut self.post_list, view.generated_posts.len());
    }

    pub fn tick_animation(&mut self) {
        if self.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }
}

fn list_len(view: &ViewState, tab: Tab) -> usize {
    match tab {
        Tab::Overview => 0,
        Tab::Targets => view.targets.len(),
        Tab::Messages => view.messages.len(),
        Tab::Posts => view.generated_posts.len(),
    }
}

fn select_next(list: &mut ListState, len: usize) {
    if len > 0 {
        let i = list.selected().map_or(0, |i| (i + 1).min(len - 1));
        list.select(Some(i));
    }
}

fn select_prev(list: &mut ListState) {
    let i = list.selected().unwrap_or(0);
    list.select(Some(i.saturating_sub(1)));
}

fn clamp(list: &mut ListState, len: usize) {
    match (list.selected(), len) {
        (Some(_), 0) => list.select(None),
        (Some(i), len) if i >= len => list.select(Some(len - 1)),
        (None, len) if len > 0 => list.select(Some(0)),
        _ => {}
    }
}
