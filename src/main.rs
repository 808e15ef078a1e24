//! # itemshop-tui
//!
//! A terminal client for browsing the Fortnite item shop, new items and the
//! full cosmetics catalog, looking up player stats and keeping a wishlist.

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use itemshop_tui::api::{ApiConfig, DEFAULT_BASE_URL};
use itemshop_tui::app_core::ingest;
use itemshop_tui::app_core::input::{AppKeyCode, AppKeyEvent, AppMouseEvent, AppMouseKind};
use itemshop_tui::app_core::reducer;
use itemshop_tui::app_core::state::{AppAction, AppState, Tab};
use itemshop_tui::favorites::{FAVORITES_KEY, FavoritesRegistry};
use itemshop_tui::model::CosmeticsByCategory;
use itemshop_tui::runtime::native::data::{self, ApiClient};
use itemshop_tui::runtime::native::storage::FileStore;
use itemshop_tui::runtime::progress_ratio;
use itemshop_tui::{theme, ui};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};

use std::fs;
use std::io;
use std::str::FromStr;
use std::time::{Duration, Instant};

const LOG_FILE: &str = "itemshop-tui.log";
const TICK: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    long_about = "itemshop-tui: browse the Fortnite item shop, new items and the cosmetics catalog,\n\
                  look up player stats and keep a wishlist, all from the terminal."
)]
struct Args {
    /// Tab to open on start (shop, new, catalog, stats, wishlist)
    #[arg(long, default_value = "shop")]
    tab: String,

    /// UI theme (dracula, solarized, gruvbox, everforest_light)
    #[arg(short, long)]
    theme: Option<String>,

    /// Base URL of the cosmetics API
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// API key sent with player stats lookups
    #[arg(long, env = "FORTNITE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Show all paths used by the application (data, wishlist, log)
    #[arg(long)]
    config: bool,

    /// Print the wishlist and exit
    #[arg(long)]
    list_wishlist: bool,

    /// Remove every item from the wishlist
    #[arg(long)]
    clear_wishlist: bool,
}

// ---------------------------------------------------------------------------
// Crossterm → shared-reducer adapters
// ---------------------------------------------------------------------------

fn crossterm_to_app_key_event(
    code: KeyCode,
    modifiers: KeyModifiers,
    kind: KeyEventKind,
) -> Option<AppKeyEvent> {
    if matches!(kind, KeyEventKind::Release) {
        return None;
    }

    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);
    let shift = modifiers.contains(KeyModifiers::SHIFT);
    let super_key = modifiers.contains(KeyModifiers::SUPER);

    let key_code = match code {
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
        KeyCode::Tab => AppKeyCode::Tab,
        KeyCode::BackTab => AppKeyCode::BackTab,
        _ => return None,
    };

    Some(AppKeyEvent {
        code: key_code,
        ctrl: ctrl || super_key,
        alt,
        shift,
        is_release: false,
    })
}

fn crossterm_to_app_mouse_event(mouse: &event::MouseEvent) -> Option<AppMouseEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(event::MouseButton::Left) => AppMouseKind::LeftDown,
        MouseEventKind::ScrollUp => AppMouseKind::ScrollUp,
        MouseEventKind::ScrollDown => AppMouseKind::ScrollDown,
        MouseEventKind::Moved | MouseEventKind::Drag(_) => AppMouseKind::Move,
        _ => return None,
    };
    Some(AppMouseEvent::new(kind, mouse.column, mouse.row))
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn init_logging(data_dir: &std::path::Path) -> Result<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let app_version = format!("v{}", env!("CARGO_PKG_VERSION"));

    let theme_name = args.theme.as_deref().unwrap_or("dracula");
    let theme_enum = theme::Theme::from_str(theme_name).map_err(anyhow::Error::msg)?;
    let theme = theme_enum.config();
    let initial_tab = Tab::from_str(&args.tab).map_err(anyhow::Error::msg)?;

    let data_dir = data::get_data_dir()?;
    let store = FileStore::new(&data_dir);

    if args.config {
        println!("App Paths:");
        println!("  Data:     {}", data_dir.display());
        println!("  Wishlist: {}", store.path_for(FAVORITES_KEY).display());
        println!("  Log:      {}", data_dir.join(LOG_FILE).display());
        return Ok(());
    }

    init_logging(&data_dir)?;
    let mut favorites = FavoritesRegistry::load(Box::new(store));

    if args.list_wishlist {
        if favorites.is_empty() {
            println!("Your wishlist is empty.");
        }
        for item in favorites.list() {
            let kind = item.type_label.as_deref().unwrap_or("Item");
            println!("{}  {} ({})", item.id, item.display_name, kind);
        }
        return Ok(());
    }

    if args.clear_wishlist {
        if favorites.is_empty() {
            println!("Wishlist is already empty.");
        } else {
            let removed = favorites.len();
            favorites.clear()?;
            println!("Removed {removed} item(s) from the wishlist.");
        }
        return Ok(());
    }

    let client = ApiClient::new(ApiConfig::new(args.api_url.clone(), args.api_key.clone()))?;
    info!("Starting itemshop-tui {app_version} against {}", args.api_url);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = AppState::new(theme, favorites, app_version);

    let res = (|| -> Result<()> {
        load_initial_data(&mut terminal, &mut app, &client, initial_tab)?;
        run_app(&mut terminal, &mut app, &client)
    })();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    client: &ApiClient,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    terminal.draw(|f| ui::ui(f, app))?;

    loop {
        if app.should_quit {
            break;
        }

        // Redraw on every tick so the rotation countdown keeps moving.
        if !event::poll(TICK)? {
            terminal.draw(|f| ui::ui(f, app))?;
            continue;
        }

        match event::read()? {
            Event::Key(key) => {
                if let Some(event) = crossterm_to_app_key_event(key.code, key.modifiers, key.kind)
                {
                    reducer::handle_key_event(app, event);
                }
                if let Some(action) = app.pending_action.take() {
                    handle_action(terminal, app, client, action)?;
                }
                terminal.draw(|f| ui::ui(f, app))?;
            }
            Event::Mouse(mouse) => {
                let changed = crossterm_to_app_mouse_event(&mouse)
                    .is_some_and(|event| reducer::handle_mouse_event(app, event));
                if changed || app.pending_action.is_some() {
                    if let Some(action) = app.pending_action.take() {
                        handle_action(terminal, app, client, action)?;
                    }
                    terminal.draw(|f| ui::ui(f, app))?;
                }
            }
            Event::Resize(_, _) => {
                terminal.draw(|f| ui::ui(f, app))?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// The shop backs the wishlist's live prices, so it loads first whatever tab
/// opens.
fn load_initial_data<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    client: &ApiClient,
    initial_tab: Tab,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    if app.begin_load(Tab::Shop) {
        handle_action(terminal, app, client, AppAction::Load(Tab::Shop))?;
    }
    app.activate_tab(initial_tab);
    if let Some(action) = app.pending_action.take() {
        handle_action(terminal, app, client, action)?;
    }
    Ok(())
}

fn handle_action<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    client: &ApiClient,
    action: AppAction,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Show the loading state before the blocking request starts.
    terminal.draw(|f| ui::ui(f, app))?;

    match action {
        AppAction::Load(Tab::Shop) => {
            let result = client.fetch_shop();
            ingest::apply_shop(app, result);
        }
        AppAction::Load(Tab::New) => {
            let result = client.fetch_new_items();
            ingest::apply_new_items(app, result);
        }
        AppAction::Load(Tab::Catalog) => load_catalog_with_ui(terminal, app, client)?,
        AppAction::Load(tab) => {
            info!("Ignoring load request for local tab {}", tab.title());
        }
        AppAction::LookupPlayer(name) => {
            info!("Looking up stats for {name}");
            let result = client.fetch_stats(&name);
            ingest::apply_stats(app, &name, result);
        }
    }

    Ok(())
}

fn load_catalog_with_ui<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    client: &ApiClient,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    app.start_progress("Loading cosmetics", &["Downloading", "Parsing"]);
    terminal.draw(|f| ui::ui(f, app))?;

    let mut last_ratio = -1.0;
    let mut last_draw = Instant::now();
    let mut draw_error: Option<anyhow::Error> = None;
    let download = client.download_cosmetics_with_progress(|progress| {
        let ratio = progress_ratio(progress.downloaded, progress.total);
        let elapsed_ok = last_draw.elapsed() >= Duration::from_millis(120);
        let ratio_ok = (ratio - last_ratio).abs() >= 0.01;
        let should_draw = if progress.total.is_some() {
            ratio_ok || elapsed_ok
        } else {
            elapsed_ok
        };
        if !should_draw {
            return;
        }
        if draw_error.is_none() {
            app.update_stage("Downloading", ratio);
            if let Err(err) = terminal.draw(|f| ui::ui(f, app)) {
                draw_error = Some(anyhow::Error::from(err));
            } else {
                last_draw = Instant::now();
                last_ratio = ratio;
            }
        }
    });

    if let Some(err) = draw_error {
        app.clear_progress();
        return Err(err);
    }

    app.finish_stage("Downloading");
    app.update_stage("Parsing", 0.0);
    terminal.draw(|f| ui::ui(f, app))?;

    let result = download.and_then(|raw| raw.decode::<CosmeticsByCategory>());
    app.finish_stage("Parsing");
    terminal.draw(|f| ui::ui(f, app))?;
    ingest::apply_catalog(app, result);
    app.clear_progress();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_adapter_maps_modifiers() {
        let event =
            crossterm_to_app_key_event(KeyCode::Char('r'), KeyModifiers::SUPER, KeyEventKind::Press)
                .unwrap();
        assert_eq!(event.code, AppKeyCode::Char('r'));
        assert!(event.ctrl);
        assert!(!event.shift);

        let event =
            crossterm_to_app_key_event(KeyCode::BackTab, KeyModifiers::SHIFT, KeyEventKind::Press)
                .unwrap();
        assert_eq!(event.code, AppKeyCode::BackTab);
        assert!(event.shift);
    }

    #[test]
    fn test_key_adapter_drops_release_and_unknown() {
        assert!(
            crossterm_to_app_key_event(KeyCode::Enter, KeyModifiers::NONE, KeyEventKind::Release)
                .is_none()
        );
        assert!(
            crossterm_to_app_key_event(KeyCode::F(5), KeyModifiers::NONE, KeyEventKind::Press)
                .is_none()
        );
    }

    #[test]
    fn test_mouse_adapter() {
        let mouse = |kind| event::MouseEvent {
            kind,
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };

        let down = crossterm_to_app_mouse_event(&mouse(MouseEventKind::Down(
            event::MouseButton::Left,
        )))
        .unwrap();
        assert_eq!(down.kind, AppMouseKind::LeftDown);
        assert_eq!((down.column, down.row), (7, 3));

        let scroll = crossterm_to_app_mouse_event(&mouse(MouseEventKind::ScrollDown)).unwrap();
        assert_eq!(scroll.kind, AppMouseKind::ScrollDown);

        assert!(
            crossterm_to_app_mouse_event(&mouse(MouseEventKind::Down(event::MouseButton::Right)))
                .is_none()
        );
    }

    #[test]
    fn test_args_parse_defaults() {
        let args = Args::try_parse_from(["itemshop-tui"]).unwrap();
        assert_eq!(args.tab, "shop");
        assert_eq!(args.api_url, DEFAULT_BASE_URL);
        assert!(!args.list_wishlist);

        let args = Args::try_parse_from(["itemshop-tui", "--tab", "catalog", "-t", "gruvbox"])
            .unwrap();
        assert_eq!(args.tab, "catalog");
        assert_eq!(args.theme.as_deref(), Some("gruvbox"));
    }
}
