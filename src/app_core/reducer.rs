//! Shared event reducer: pure-ish handlers for key and mouse events.
//!
//! Both the native and web runtimes call these functions after converting their
//! platform-specific events to [`AppKeyEvent`] / [`AppMouseEvent`].

use crate::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use crate::app_core::state::{AppState, Focus, InputMode, ListRow, Tab};
use crate::app_core::text_input::TextInput;
use crate::card;
use crate::ui;

pub const SCROLL_LINES: u16 = 1;

/// Rows moved by PageUp/PageDown when the list has not been drawn yet.
const DEFAULT_PAGE_ROWS: u16 = 10;

fn page_rows(app: &AppState) -> isize {
    app.list_content_area
        .map(|area| area.height.max(1))
        .unwrap_or(DEFAULT_PAGE_ROWS) as isize
}

fn focused_input(app: &mut AppState) -> Option<&mut TextInput> {
    match app.focus {
        Focus::Filter => Some(&mut app.catalog_filter),
        Focus::PlayerName => Some(&mut app.player_name),
        Focus::List => None,
    }
}

/// Runs `edit` on the focused text box, re-filtering the catalog when the
/// filter box changed.
fn edit_input(app: &mut AppState, edit: impl FnOnce(&mut TextInput)) {
    let Some(input) = focused_input(app) else {
        return;
    };
    let before = input.text.clone();
    edit(input);
    let changed = input.text != before;
    if changed && app.focus == Focus::Filter {
        app.apply_filter_text();
    }
}

fn input_for_tab(tab: Tab) -> Option<Focus> {
    match tab {
        Tab::Catalog => Some(Focus::Filter),
        Tab::Stats => Some(Focus::PlayerName),
        _ => None,
    }
}

fn toggle_detail_favorite(app: &mut AppState) {
    if let Some(item) = app.detail.clone() {
        app.toggle_favorite(&item);
    }
}

/// Handle a runtime-agnostic key event, mutating `app` in place.
///
/// May set `app.pending_action`; the runtime is responsible for acting on it
/// after this function returns.
pub fn handle_key_event(app: &mut AppState, event: AppKeyEvent) {
    if event.is_release {
        return;
    }

    let code = event.code;
    let ctrl = event.ctrl;
    let alt = event.alt;

    if ctrl && code == AppKeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    if app.show_progress {
        return;
    }

    if app.show_help {
        if matches!(code, AppKeyCode::Char('?') | AppKeyCode::Esc | AppKeyCode::Char('q')) {
            app.show_help = false;
        }
        return;
    }

    if app.detail.is_some() {
        match code {
            AppKeyCode::Esc | AppKeyCode::Enter | AppKeyCode::Char('q') => app.close_detail(),
            AppKeyCode::Char(' ') => toggle_detail_favorite(app),
            _ => {}
        }
        return;
    }

    if ctrl && code == AppKeyCode::Char('r') {
        app.reload_active_tab();
        return;
    }

    if code == AppKeyCode::Tab || code == AppKeyCode::BackTab {
        let target = if code == AppKeyCode::BackTab || event.shift {
            app.active_tab.prev()
        } else {
            app.active_tab.next()
        };
        app.activate_tab(target);
        return;
    }

    if app.active_tab == Tab::Catalog && ctrl {
        match code {
            AppKeyCode::Char('t') => {
                app.cycle_type_filter();
                return;
            }
            AppKeyCode::Char('o') => {
                app.cycle_sort_key();
                return;
            }
            _ => {}
        }
    }

    match app.input_mode {
        InputMode::Normal => match code {
            AppKeyCode::Char('q') => app.should_quit = true,
            AppKeyCode::Char('?') => app.show_help = true,
            AppKeyCode::Char(c @ '1'..='5') if !ctrl && !alt => {
                let idx = c as usize - '1' as usize;
                app.activate_tab(Tab::ALL[idx]);
            }
            AppKeyCode::Left => app.activate_tab(app.active_tab.prev()),
            AppKeyCode::Right => app.activate_tab(app.active_tab.next()),
            AppKeyCode::Char('/') => {
                if let Some(focus) = input_for_tab(app.active_tab) {
                    app.focus_input(focus);
                }
            }
            AppKeyCode::Up if app.active_tab == Tab::Stats => app.stats_scroll.scroll_up(),
            AppKeyCode::Down if app.active_tab == Tab::Stats => app.stats_scroll.scroll_down(),
            AppKeyCode::PageUp if app.active_tab == Tab::Stats => {
                app.stats_scroll.scroll_page_up()
            }
            AppKeyCode::PageDown if app.active_tab == Tab::Stats => {
                app.stats_scroll.scroll_page_down()
            }
            AppKeyCode::Home if app.active_tab == Tab::Stats => {
                app.stats_scroll = tui_scrollview::ScrollViewState::default();
            }
            AppKeyCode::End if app.active_tab == Tab::Stats => app.stats_scroll.scroll_to_bottom(),
            AppKeyCode::Enter if app.active_tab == Tab::Stats => {
                app.focus_input(Focus::PlayerName);
            }
            AppKeyCode::Up => app.move_selection(-1),
            AppKeyCode::Down => app.move_selection(1),
            AppKeyCode::PageUp => app.move_selection(-page_rows(app)),
            AppKeyCode::PageDown => app.move_selection(page_rows(app)),
            AppKeyCode::Home => app.select_first(),
            AppKeyCode::End => app.select_last(),
            AppKeyCode::Enter => app.activate_selected(),
            AppKeyCode::Char(' ') => app.toggle_selected_favorite(),
            AppKeyCode::Char(c) if c.is_alphanumeric() && !ctrl && !alt => {
                if let Some(focus) = input_for_tab(app.active_tab) {
                    app.focus_input(focus);
                    edit_input(app, |input| {
                        input.move_to_end();
                        input.insert_char(c);
                    });
                }
            }
            _ => {}
        },
        InputMode::Editing => match code {
            AppKeyCode::Enter => {
                if app.focus == Focus::PlayerName {
                    app.submit_player_lookup();
                } else {
                    app.focus_input(Focus::List);
                }
            }
            AppKeyCode::Esc => app.focus_input(Focus::List),
            AppKeyCode::Down if app.focus == Focus::Filter => {
                app.focus_input(Focus::List);
                app.clamp_selection();
            }
            AppKeyCode::Char('u') if ctrl => edit_input(app, TextInput::clear),
            AppKeyCode::Char('w') if ctrl => edit_input(app, TextInput::delete_word),
            AppKeyCode::Char('a') if ctrl => edit_input(app, TextInput::move_to_start),
            AppKeyCode::Char('e') if ctrl => edit_input(app, TextInput::move_to_end),
            AppKeyCode::Char(c) if !ctrl => edit_input(app, |input| input.insert_char(c)),
            AppKeyCode::Backspace => edit_input(app, TextInput::backspace),
            AppKeyCode::Delete => edit_input(app, TextInput::delete),
            AppKeyCode::Left => edit_input(app, TextInput::move_left),
            AppKeyCode::Right => edit_input(app, TextInput::move_right),
            AppKeyCode::Home => edit_input(app, TextInput::move_to_start),
            AppKeyCode::End => edit_input(app, TextInput::move_to_end),
            _ => {}
        },
    }
}

/// Places the caret of `input` under the clicked column.
fn set_caret_from_click(input: &mut TextInput, area: ratatui::layout::Rect, column: u16) {
    let horizontal_scroll = ui::input_horizontal_scroll(&input.text, input.cursor, area.width);
    let local_x = column.saturating_sub(area.x);
    let target_column = horizontal_scroll + local_x;
    input.set_cursor(ui::input_cursor_for_column(&input.text, target_column));
}

fn contains(area: Option<ratatui::layout::Rect>, column: u16, row: u16) -> bool {
    area.is_some_and(|area| area.contains((column, row).into()))
}

fn handle_left_click(app: &mut AppState, column: u16, row: u16) -> bool {
    if app.show_help {
        app.show_help = false;
        return true;
    }

    if app.detail.is_some() {
        if contains(app.detail_favorite_area, column, row) {
            toggle_detail_favorite(app);
        } else if !contains(app.detail_area, column, row) {
            app.close_detail();
        }
        return true;
    }

    if let Some(tab) = app
        .tab_hitboxes
        .iter()
        .find(|(_, area)| area.contains((column, row).into()))
        .map(|(tab, _)| *tab)
    {
        app.activate_tab(tab);
        return true;
    }

    if app.active_tab == Tab::Catalog && contains(app.filter_area, column, row) {
        app.focus_input(Focus::Filter);
        if let Some(area) = app.filter_input_area
            && area.contains((column, row).into())
        {
            set_caret_from_click(&mut app.catalog_filter, area, column);
        }
        return true;
    }

    if app.active_tab == Tab::Stats
        && let Some(area) = app.player_input_area
        && area.contains((column, row).into())
    {
        app.focus_input(Focus::PlayerName);
        set_caret_from_click(&mut app.player_name, area, column);
        return true;
    }

    let Some(content_area) = app.list_content_area else {
        return false;
    };
    if app.active_tab == Tab::Stats || !content_area.contains((column, row).into()) {
        return false;
    }

    let tab_idx = app.active_tab.index();
    let clicked = app.list_states[tab_idx].offset() + row.saturating_sub(content_area.y) as usize;
    let action = match app.rows(app.active_tab).get(clicked) {
        Some(ListRow::Item(item)) => {
            Some(card::render(item, &app.favorites).action_at(column.saturating_sub(content_area.x)))
        }
        Some(ListRow::LoadMore { .. }) => None,
        _ => return false,
    };

    app.focus_input(Focus::List);
    app.list_states[tab_idx].select(Some(clicked));
    match action {
        Some(action) => app.dispatch_card_action(action),
        None => app.load_more(),
    }
    true
}

/// Handle a runtime-agnostic mouse event.
///
/// `event.column` and `event.row` must already be in terminal cell coordinates.
/// Returns `true` if the UI needs to be redrawn.
pub fn handle_mouse_event(app: &mut AppState, event: AppMouseEvent) -> bool {
    if app.show_progress {
        return false;
    }

    let column = event.column;
    let row = event.row;

    match event.kind {
        AppMouseKind::Move => false,
        AppMouseKind::LeftDown => handle_left_click(app, column, row),
        AppMouseKind::ScrollUp | AppMouseKind::ScrollDown => {
            if app.detail.is_some() || app.show_help {
                return false;
            }
            let scroll_down = event.kind == AppMouseKind::ScrollDown;
            if app.active_tab == Tab::Stats {
                if !contains(app.stats_area, column, row) {
                    return false;
                }
                for _ in 0..SCROLL_LINES {
                    if scroll_down {
                        app.stats_scroll.scroll_down();
                    } else {
                        app.stats_scroll.scroll_up();
                    }
                }
                return true;
            }
            if !contains(app.list_area, column, row) {
                return false;
            }
            let delta = SCROLL_LINES as isize;
            app.move_selection(if scroll_down { delta } else { -delta });
            true
        }
    }
}
