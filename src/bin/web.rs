#![cfg_attr(
    not(target_arch = "wasm32"),
    allow(dead_code, unused_imports, unused_variables)
)]

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("itemshop-tui-web must be built for wasm32-unknown-unknown");
}

// ---------------------------------------------------------------------------
// Web target (wasm32): everything below is only compiled for the browser.
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
use anyhow::Result;
#[cfg(target_arch = "wasm32")]
use itemshop_tui::api::{ApiConfig, DEFAULT_BASE_URL};
#[cfg(target_arch = "wasm32")]
use itemshop_tui::app_core::ingest;
#[cfg(target_arch = "wasm32")]
use itemshop_tui::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
#[cfg(target_arch = "wasm32")]
use itemshop_tui::app_core::reducer;
#[cfg(target_arch = "wasm32")]
use itemshop_tui::app_core::state::{AppAction, AppState, Tab};
#[cfg(target_arch = "wasm32")]
use itemshop_tui::app_core::web_mouse::{GridGeometry, PixelRect};
#[cfg(target_arch = "wasm32")]
use itemshop_tui::favorites::FavoritesRegistry;
#[cfg(target_arch = "wasm32")]
use itemshop_tui::model::CosmeticsByCategory;
#[cfg(target_arch = "wasm32")]
use itemshop_tui::runtime::web::{data::ApiClient, storage};
#[cfg(target_arch = "wasm32")]
use itemshop_tui::{theme, ui};
#[cfg(target_arch = "wasm32")]
use js_sys::Promise;
#[cfg(target_arch = "wasm32")]
use ratatui::Terminal;
#[cfg(target_arch = "wasm32")]
use ratzilla::web_sys::wasm_bindgen::{JsCast, JsValue};
#[cfg(target_arch = "wasm32")]
use ratzilla::{
    DomBackend, WebRenderer,
    event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind},
};
#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use std::str::FromStr;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen_futures::{JsFuture, spawn_local};

#[cfg(target_arch = "wasm32")]
type SharedState = Rc<RefCell<AppState>>;

// ---------------------------------------------------------------------------
// Ratzilla → shared input type adapters
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn ratzilla_to_app_key_event(key: KeyEvent) -> Option<AppKeyEvent> {
    let key_code = match key.code {
        KeyCode::Char(c) => AppKeyCode::Char(c),
        KeyCode::Backspace => AppKeyCode::Backspace,
        KeyCode::Delete => AppKeyCode::Delete,
        KeyCode::Enter => AppKeyCode::Enter,
        KeyCode::Esc => AppKeyCode::Esc,
        KeyCode::Up => AppKeyCode::Up,
        KeyCode::Down => AppKeyCode::Down,
        KeyCode::Left => AppKeyCode::Left,
        KeyCode::Right => AppKeyCode::Right,
        KeyCode::Home => AppKeyCode::Home,
        KeyCode::End => AppKeyCode::End,
        KeyCode::PageUp => AppKeyCode::PageUp,
        KeyCode::PageDown => AppKeyCode::PageDown,
        // Shift-tab arrives as Tab with the shift flag set
        KeyCode::Tab if key.shift => AppKeyCode::BackTab,
        KeyCode::Tab => AppKeyCode::Tab,
        _ => return None,
    };
    Some(AppKeyEvent {
        code: key_code,
        ctrl: key.ctrl,
        alt: key.alt,
        shift: key.shift,
        is_release: false,
    })
}

/// Ratzilla 0.3 delivers no wheel events, so only clicks and moves map.
#[cfg(target_arch = "wasm32")]
fn ratzilla_to_app_mouse_event(column: u16, row: u16, mouse: &MouseEvent) -> AppMouseEvent {
    let kind = match mouse.event {
        MouseEventKind::Pressed if mouse.button == MouseButton::Left => AppMouseKind::LeftDown,
        _ => AppMouseKind::Move,
    };
    AppMouseEvent::new(kind, column, row)
}

// ---------------------------------------------------------------------------
// Web-specific helpers
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
async fn yield_to_browser() {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = ratzilla::web_sys::window() {
            let _ = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(resolve.unchecked_ref(), 0);
        } else {
            let _ = resolve.call0(&JsValue::NULL);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Grid size in cells as seen by the last frame. The status bar sits one row
/// below the lowest recorded area.
#[cfg(target_arch = "wasm32")]
fn app_terminal_size(app: &AppState) -> Option<(u16, u16)> {
    let areas = [
        app.list_area,
        app.filter_area,
        app.stats_area,
        app.detail_area,
    ];
    let tabs = app.tab_hitboxes.iter().map(|(_, rect)| Some(*rect));

    let (max_right, max_bottom) = areas
        .into_iter()
        .chain(tabs)
        .flatten()
        .fold((0u16, 0u16), |(right, bottom), area| {
            (
                right.max(area.x.saturating_add(area.width)),
                bottom.max(area.y.saturating_add(area.height)),
            )
        });

    if max_right == 0 || max_bottom == 0 {
        None
    } else {
        Some((max_right, max_bottom.saturating_add(1)))
    }
}

#[cfg(target_arch = "wasm32")]
fn mouse_to_cell_position(app: &AppState, mouse: &MouseEvent) -> Option<(u16, u16)> {
    let window = ratzilla::web_sys::window()?;
    let document = window.document()?;
    let grid: ratzilla::web_sys::HtmlElement = document
        .get_element_by_id("grid_ratzilla_grid")?
        .dyn_into()
        .ok()?;
    let rect = grid.get_bounding_client_rect();

    let mut cell_size = None;
    if let Some(first_row) = grid.first_element_child()
        && let Ok(first_row) = first_row.dyn_into::<ratzilla::web_sys::HtmlElement>()
        && let Some(first_cell) = first_row.first_element_child()
        && let Ok(first_cell) = first_cell.dyn_into::<ratzilla::web_sys::HtmlElement>()
    {
        let height = first_row.get_bounding_client_rect().height();
        let width = first_cell.get_bounding_client_rect().width();
        if width > 0.0 && height > 0.0 {
            cell_size = Some((width, height));
        }
    }

    GridGeometry {
        rect: PixelRect {
            left: rect.left(),
            top: rect.top(),
            width: rect.width(),
            height: rect.height(),
        },
        cell_size,
        cells: app_terminal_size(app),
    }
    .cell_at(mouse.x as f64, mouse.y as f64)
}

// ---------------------------------------------------------------------------
// Action handling
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn handle_action(app_state: SharedState, client: ApiClient, action: AppAction) {
    match action {
        AppAction::Load(Tab::Shop) => spawn_local(async move {
            let result = client.fetch_shop().await;
            ingest::apply_shop(&mut app_state.borrow_mut(), result);
        }),
        AppAction::Load(Tab::New) => spawn_local(async move {
            let result = client.fetch_new_items().await;
            ingest::apply_new_items(&mut app_state.borrow_mut(), result);
        }),
        AppAction::Load(Tab::Catalog) => {
            {
                let mut app = app_state.borrow_mut();
                app.start_progress("Loading cosmetics", &["Downloading", "Parsing"]);
                app.update_stage("Downloading", 0.05);
            }
            spawn_local(async move {
                let download = client.download_cosmetics().await;
                {
                    let mut app = app_state.borrow_mut();
                    app.finish_stage("Downloading");
                    app.update_stage("Parsing", 0.0);
                }
                // Let the finished download paint before decoding blocks.
                yield_to_browser().await;
                let result = download.and_then(|raw| raw.decode::<CosmeticsByCategory>());
                app_state.borrow_mut().finish_stage("Parsing");
                yield_to_browser().await;

                let mut app = app_state.borrow_mut();
                ingest::apply_catalog(&mut app, result);
                app.clear_progress();
            });
        }
        AppAction::Load(_) => {}
        AppAction::LookupPlayer(name) => spawn_local(async move {
            let result = client.fetch_stats(&name).await;
            ingest::apply_stats(&mut app_state.borrow_mut(), &name, result);
        }),
    }
}

/// Runs `update` against the state, then starts whatever action it queued.
#[cfg(target_arch = "wasm32")]
fn dispatch(app_state: &SharedState, client: &ApiClient, update: impl FnOnce(&mut AppState)) {
    let pending_action = {
        let mut state = app_state.borrow_mut();
        update(&mut state);
        state.pending_action.take()
    };

    if let Some(action) = pending_action {
        handle_action(app_state.clone(), client.clone(), action);
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[cfg(target_arch = "wasm32")]
fn main() -> Result<()> {
    console_error_panic_hook::set_once();

    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));
    let theme = theme::Theme::from_str("dracula")
        .map_err(anyhow::Error::msg)?
        .config();
    let api_key = option_env!("FORTNITE_API_KEY").map(str::to_string);
    let client = ApiClient::new(ApiConfig::new(DEFAULT_BASE_URL, api_key));

    let favorites = FavoritesRegistry::load(storage::open_store());
    let app = Rc::new(RefCell::new(AppState::new(theme, favorites, app_version)));

    dispatch(&app, &client, |state| {
        if state.begin_load(Tab::Shop) {
            state.pending_action = Some(AppAction::Load(Tab::Shop));
        }
    });

    let backend = DomBackend::new_by_id("grid").map_err(|err| anyhow::anyhow!(err.to_string()))?;
    let terminal = Terminal::new(backend)?;

    terminal.on_key_event({
        let event_state = app.clone();
        let client = client.clone();
        move |key_event| {
            dispatch(&event_state, &client, |state| {
                if let Some(event) = ratzilla_to_app_key_event(key_event) {
                    reducer::handle_key_event(state, event);
                }
            });
        }
    });

    terminal.on_mouse_event({
        let event_state = app.clone();
        move |mouse_event| {
            dispatch(&event_state, &client, |state| {
                if let Some((column, row)) = mouse_to_cell_position(state, &mouse_event) {
                    let event = ratzilla_to_app_mouse_event(column, row, &mouse_event);
                    let _ = reducer::handle_mouse_event(state, event);
                }
            });
        }
    });

    terminal.draw_web(move |f| {
        let mut state = app.borrow_mut();
        ui::ui(f, &mut state);
    });

    Ok(())
}
