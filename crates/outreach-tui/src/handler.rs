use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use outreach_core::Tab;

use crate::app::{App, InputMode};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
    }
    app.collect_finished_tasks().await;
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    // Any key dismisses the notice popup
    if app.notice.take().is_some() {
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_form_editing(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('1') => app.select_tab(Tab::Overview),
        KeyCode::Char('2') => app.select_tab(Tab::Targets),
        KeyCode::Char('3') => app.select_tab(Tab::Messages),
        KeyCode::Char('4') => app.select_tab(Tab::Posts),
        KeyCode::Tab | KeyCode::Right => app.next_tab(),
        KeyCode::BackTab | KeyCode::Left => app.prev_tab(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('c') => app.test_connections(),
        KeyCode::Char('j') | KeyCode::Down => app.list_down(),
        KeyCode::Char('k') | KeyCode::Up => app.list_up(),
        _ => match app.active_tab() {
            Tab::Overview => handle_overview(app, key),
            Tab::Targets => handle_targets(app, key),
            Tab::Messages => handle_messages(app, key),
            Tab::Posts => handle_posts(app, key),
        },
    }
}

fn handle_overview(app: &mut App, key: KeyEvent) {
    // Quick actions
    match key.code {
        KeyCode::Char('a') => {
            app.select_tab(Tab::Targets);
            app.start_editing();
        }
        KeyCode::Char('m') => app.select_tab(Tab::Messages),
        KeyCode::Char('p') => app.select_tab(Tab::Posts),
        _ => {}
    }
}

fn handle_targets(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('i') | KeyCode::Char('a') => app.start_editing(),
        KeyCode::Char('g') | KeyCode::Enter => app.generate_for_selected(),
        KeyCode::Char('s') => app.cycle_selected_status(),
        _ => {}
    }
}

fn handle_messages(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('t') => app.cycle_message_type(),
        KeyCode::Char('p') => app.cycle_provider(),
        _ => {}
    }
}

fn handle_posts(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('g') {
        app.generate_post();
    }
}

fn handle_form_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.stop_editing(),
        KeyCode::Enter => app.submit_target(),
        KeyCode::Tab | KeyCode::Down => app.next_form_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_form_field(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_push(c),
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.list_down(),
        MouseEventKind::ScrollUp => app.list_up(),
        _ => {}
    }
}
