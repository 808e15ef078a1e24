use chrono::Utc;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect, Size},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{
        Block, BorderType, Borders, Clear, LineGauge, List, ListItem, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Wrap,
    },
};
use tui_scrollview::{ScrollView, ScrollbarVisibility};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app_core::state::{
    AppState, EMPTY_USERNAME, Focus, InputMode, ListRow, LoadStatus, STATS_ERROR_HINT, StatsView,
    Tab,
};
use crate::app_core::text_input::TextInput;
use crate::card::{self, Card, PriceLabel};
use crate::countdown;
use crate::normalize::DisplayItem;
use crate::stats::StatsReport;
use crate::theme::{self, ThemeConfig};

const TAB_SEPARATOR: &str = " │ ";

/// Main UI entry point that renders the entire application layout.
pub fn ui(f: &mut Frame, app: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(0),    // Tab content
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    render_tab_bar(f, app, chunks[0]);

    app.list_area = None;
    app.list_content_area = None;
    app.filter_area = None;
    app.filter_input_area = None;
    app.player_input_area = None;
    app.stats_area = None;

    match app.active_tab {
        Tab::Catalog => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            render_filter(f, app, parts[0]);
            render_item_list(f, app, parts[1]);
        }
        Tab::Stats => render_stats(f, app, chunks[1]),
        _ => render_item_list(f, app, chunks[1]),
    }

    render_status_bar(f, app, chunks[2]);

    if app.detail.is_some() {
        render_detail_modal(f, app);
    } else {
        app.detail_area = None;
        app.detail_favorite_area = None;
    }

    if app.show_progress {
        render_progress_modal(f, app);
    } else if app.show_help {
        render_help_overlay(f, app);
    }
}

fn tab_label(app: &AppState, tab: Tab) -> String {
    let number = tab.index() + 1;
    match tab {
        Tab::Wishlist => format!("{number} {} ({})", tab.title(), app.favorites.len()),
        _ => format!("{number} {}", tab.title()),
    }
}

/// Renders the tab strip and records a hitbox per tab.
fn render_tab_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let mut spans = Vec::new();
    let mut hitboxes = Vec::new();
    let mut x = area.x + 1;
    spans.push(Span::raw(" "));

    for (idx, tab) in Tab::ALL.iter().copied().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(TAB_SEPARATOR, app.theme.border));
            x = x.saturating_add(TAB_SEPARATOR.width() as u16);
        }
        let label = tab_label(app, tab);
        let width = label.width() as u16;
        let style = if tab == app.active_tab {
            app.theme.accent.add_modifier(Modifier::UNDERLINED)
        } else {
            app.theme.muted
        };
        let visible = width.min((area.x + area.width).saturating_sub(x));
        if visible > 0 {
            hitboxes.push((tab, Rect::new(x, area.y, visible, 1)));
        }
        spans.push(Span::styled(label, style));
        x = x.saturating_add(width);
    }

    app.tab_hitboxes = hitboxes;
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(app.theme.text),
        area,
    );
}

fn format_vbucks(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn price_spans(price: PriceLabel, theme: &ThemeConfig) -> Vec<Span<'static>> {
    match price {
        PriceLabel::New => vec![Span::styled("NEW", theme.accent)],
        PriceLabel::Offer {
            final_price,
            regular_price,
        } => {
            let mut spans = vec![Span::styled(
                format!("{} V-Bucks", format_vbucks(final_price)),
                theme.accent,
            )];
            if let Some(regular) = regular_price {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format_vbucks(regular),
                    theme.muted.add_modifier(Modifier::CROSSED_OUT),
                ));
            }
            spans
        }
        PriceLabel::Unavailable => vec![Span::styled("Not in shop", theme.muted)],
    }
}

fn secondary_label(item: &DisplayItem) -> String {
    item.type_label
        .clone()
        .unwrap_or_else(|| item.category.label().to_string())
}

/// One list line for a card: favorite glyph, swatch, name, type, price, banner.
/// The favorite glyph sits at the row start so clicks on it resolve through
/// [`Card::action_at`].
fn card_line(card: &Card<'_>, theme: &ThemeConfig) -> Line<'static> {
    let glyph_style = if card.is_favorite {
        theme.favorite
    } else {
        theme.muted
    };
    let mut spans = vec![
        Span::styled(card.favorite_glyph(), glyph_style),
        Span::raw(" "),
        Span::styled(
            "■ ",
            Style::default().fg(theme::card_color(card.background)),
        ),
        Span::raw(card.item.display_name.clone()),
        Span::styled(format!("  {}  ", secondary_label(card.item)), theme.muted),
    ];
    spans.extend(price_spans(card.price, theme));
    if let Some(banner) = card.banner
        && card.price != PriceLabel::New
    {
        spans.push(Span::styled(format!("  [{banner}]"), theme.accent));
    }
    Line::from(spans)
}

fn row_item(app: &AppState, row: &ListRow<'_>, theme: &ThemeConfig) -> ListItem<'static> {
    match row {
        ListRow::Header(title) => ListItem::new(Line::from(Span::styled(
            format!("── {title} ──"),
            theme.title,
        ))),
        ListRow::Item(item) => ListItem::new(card_line(&card::render(item, &app.favorites), theme)),
        ListRow::LoadMore { remaining } => ListItem::new(Line::from(Span::styled(
            format!("▼ Load more ({remaining} remaining)"),
            theme.accent,
        ))),
        ListRow::Message(message) => {
            let style = if matches!(app.status(app.active_tab), LoadStatus::Failed(_)) {
                theme.error
            } else {
                theme.muted
            };
            ListItem::new(Line::from(Span::styled(message.to_string(), style)))
        }
    }
}

fn list_title(app: &AppState) -> String {
    match app.active_tab {
        Tab::Shop => match &app.shop_date {
            Some(date) => format!(" Item Shop ({}) ", date.get(..10).unwrap_or(date)),
            None => " Item Shop ".to_string(),
        },
        Tab::Catalog => format!(
            " All Cosmetics ({}/{}) ",
            app.catalog.rendered_len(),
            app.catalog.view_len()
        ),
        Tab::Wishlist => format!(" Wishlist ({}) ", app.wishlist_view.len()),
        tab => format!(" {} ", tab.title()),
    }
}

/// Renders the rows of the active list tab.
fn render_item_list(f: &mut Frame, app: &mut AppState, area: Rect) {
    let theme = app.theme.clone();
    let rows = app.rows(app.active_tab);
    let row_count = rows.len();
    let items: Vec<ListItem> = rows.iter().map(|row| row_item(app, row, &theme)).collect();
    drop(rows);

    let is_focused = app.focus == Focus::List && app.detail.is_none();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme.border_selected
        } else {
            theme.border
        })
        .title_style(theme.title)
        .title(list_title(app))
        .title_bottom(if is_focused {
            Line::from(" ↑/↓ move • Enter open • Space wishlist ").right_aligned()
        } else {
            Line::from("").right_aligned()
        })
        .title_alignment(Alignment::Left)
        .style(theme.list_normal);

    app.list_area = Some(area);
    app.list_content_area = Some(block.inner(area));

    let highlight = if is_focused {
        theme.list_selected
    } else {
        theme.list_normal
    };
    let list = List::new(items)
        .block(block)
        .style(theme.list_normal)
        .scroll_padding(2)
        .highlight_style(highlight);

    let state = &mut app.list_states[app.active_tab.index()];
    f.render_stateful_widget(list, area, state);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    let mut scrollbar_state =
        ScrollbarState::new(row_count).position(state.selected().unwrap_or(0));
    f.render_stateful_widget(
        scrollbar,
        area.inner(Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut scrollbar_state,
    );
}

/// Draws a bordered single-line text box and places the terminal cursor when
/// it is being edited. Returns the inner (typing) area.
#[allow(clippy::too_many_arguments)]
fn render_text_input(
    f: &mut Frame,
    theme: &ThemeConfig,
    input: &TextInput,
    editing: bool,
    area: Rect,
    title: &str,
    hint: Line<'_>,
    placeholder: &str,
) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if editing {
            theme.border_selected
        } else {
            theme.border
        })
        .title(title.to_string())
        .title_style(theme.title)
        .title_bottom(hint.right_aligned());

    let inner = block.inner(area);
    let horizontal_scroll = input_horizontal_scroll(&input.text, input.cursor, inner.width);

    let content = if input.is_empty() && !editing {
        Text::from(Line::from(Span::styled(
            placeholder.to_string(),
            theme.text.add_modifier(Modifier::DIM).italic(),
        )))
    } else {
        Text::from(input.as_str())
    };

    let paragraph = Paragraph::new(content)
        .block(block)
        .style(theme.text)
        .scroll((0, horizontal_scroll));
    f.render_widget(paragraph, area);

    if editing && inner.width > 0 && inner.height > 0 {
        let cursor_offset = input_cursor_offset(&input.text, input.cursor);
        let max_x = inner.width.saturating_sub(1);
        let visible_cursor_offset = cursor_offset.saturating_sub(horizontal_scroll);
        f.set_cursor_position((inner.x + visible_cursor_offset.min(max_x), inner.y));
    }
    inner
}

/// Renders the catalog filter box with the active type and sort.
fn render_filter(f: &mut Frame, app: &mut AppState, area: Rect) {
    let editing = app.input_mode == InputMode::Editing && app.focus == Focus::Filter;
    let criteria = app.filter_criteria();
    let hint = Line::from(vec![
        Span::raw(" Type: "),
        Span::styled(criteria.type_filter.label(), app.theme.accent),
        Span::raw(" (Ctrl+T) • Sort: "),
        Span::styled(criteria.sort_key.label(), app.theme.accent),
        Span::raw(" (Ctrl+O) "),
    ]);
    let inner = render_text_input(
        f,
        &app.theme,
        &app.catalog_filter,
        editing,
        area,
        " Filter (/) ",
        hint,
        "Search cosmetics by name",
    );
    app.filter_area = Some(area);
    app.filter_input_area = Some(inner);
}

fn stats_report_lines(report: &StatsReport, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(report.player.clone(), theme.title)),
        Line::from(Span::styled(report.battle_pass_line(), theme.muted)),
    ];
    for stats_card in &report.cards {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            stats_card.title,
            theme.accent.add_modifier(Modifier::UNDERLINED),
        )));
        for row in &stats_card.rows {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <12}", row.label), theme.muted),
                Span::styled(row.value.clone(), theme.text),
            ]));
        }
    }
    lines
}

/// Renders the player lookup box and whatever the last lookup produced.
fn render_stats(f: &mut Frame, app: &mut AppState, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let editing = app.input_mode == InputMode::Editing && app.focus == Focus::PlayerName;
    let inner = render_text_input(
        f,
        &app.theme,
        &app.player_name,
        editing,
        parts[0],
        " Player (/) ",
        Line::from(" Enter search "),
        "Epic Games username",
    );
    app.player_input_area = Some(inner);

    let theme = app.theme.clone();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(" Stats ")
        .title_style(theme.title)
        .style(theme.text);
    let content_area = block.inner(parts[1]);
    f.render_widget(block, parts[1]);
    app.stats_area = Some(parts[1]);

    let message = |text: String, style: Style| Paragraph::new(Span::styled(text, style));
    match &app.stats_view {
        StatsView::Idle => f.render_widget(
            message(
                "Enter an Epic Games username and press Enter.".to_string(),
                theme.muted,
            ),
            content_area,
        ),
        StatsView::Prompt => f.render_widget(
            message(EMPTY_USERNAME.to_string(), theme.error),
            content_area,
        ),
        StatsView::Loading(name) => f.render_widget(
            message(format!("Searching for {name}..."), theme.muted),
            content_area,
        ),
        StatsView::NoStats(text) => {
            f.render_widget(message(text.clone(), theme.muted), content_area)
        }
        StatsView::Failed(text) => f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(text.clone(), theme.error)),
                Line::from(Span::styled(STATS_ERROR_HINT, theme.muted)),
            ])
            .wrap(Wrap { trim: true }),
            content_area,
        ),
        StatsView::Report(report) => {
            let lines = stats_report_lines(report, &theme);
            let width = content_area.width.saturating_sub(2);
            if width == 0 || content_area.height == 0 {
                return;
            }
            let mut scroll_view = ScrollView::new(Size::new(width, lines.len() as u16))
                .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
                .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
            let scroll_area = scroll_view.area();
            scroll_view.buf_mut().set_style(scroll_area, theme.text);
            scroll_view.render_widget(Paragraph::new(lines).style(theme.text), scroll_area);

            let view_area = Rect::new(
                content_area.x + 1,
                content_area.y,
                width,
                content_area.height,
            );
            f.render_stateful_widget(scroll_view, view_area, &mut app.stats_scroll);
        }
    }
}

fn centered_rect(area: Rect, max_width: u16, max_height: u16) -> Rect {
    let width = area.width.min(max_width).saturating_sub(4);
    let height = max_height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

fn detail_lines(item: &DisplayItem, theme: &ThemeConfig) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            item.rarity.label().to_string(),
            Style::default().fg(theme::rarity_color(item.rarity)),
        ),
        Span::styled(format!(" {}", secondary_label(item)), theme.muted),
    ])];

    let mut price = vec![Span::raw("Price: ")];
    price.extend(price_spans(PriceLabel::for_item(item), theme));
    lines.push(Line::from(price));

    if let Some(banner) = &item.banner_text {
        lines.push(Line::from(Span::styled(banner.clone(), theme.accent)));
    }
    lines.push(Line::from(""));

    for text in [&item.description, &item.set_text, &item.introduction]
        .into_iter()
        .flatten()
    {
        lines.push(Line::from(Span::styled(text.clone(), theme.text)));
    }
    if let Some(artist) = &item.artist {
        lines.push(Line::from(Span::styled(format!("Artist: {artist}"), theme.muted)));
    }
    if let Some(added) = item.added_date {
        lines.push(Line::from(Span::styled(
            format!("Added: {}", added.format("%Y-%m-%d")),
            theme.muted,
        )));
    }
    lines
}

/// Renders the item detail modal and records its hit areas.
fn render_detail_modal(f: &mut Frame, app: &mut AppState) {
    let Some(item) = app.detail.as_ref() else {
        return;
    };
    let theme = &app.theme;
    let popup_rect = centered_rect(f.area(), 72, 20);
    if popup_rect.width == 0 || popup_rect.height == 0 {
        return;
    }

    f.render_widget(Clear, popup_rect);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_selected)
        .border_type(BorderType::Rounded)
        .style(theme.text)
        .title(format!(" {} ", item.display_name))
        .title_style(theme.title)
        .title_bottom(Line::from(" Space wishlist • Esc close ").right_aligned());
    let inner = block.inner(popup_rect).inner(Margin::new(1, 0));
    f.render_widget(block, popup_rect);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    f.render_widget(
        Paragraph::new(detail_lines(item, theme))
            .style(theme.text)
            .wrap(Wrap { trim: true }),
        parts[0],
    );

    let favorite = card::render(item, &app.favorites);
    let label = if favorite.is_favorite {
        format!("[{} In wishlist]", favorite.favorite_glyph())
    } else {
        format!("[{} Add to wishlist]", favorite.favorite_glyph())
    };
    let favorite_area = Rect::new(
        parts[1].x,
        parts[1].y,
        (label.width() as u16).min(parts[1].width),
        parts[1].height,
    );
    f.render_widget(
        Paragraph::new(Span::styled(label, theme.favorite)),
        favorite_area,
    );

    app.detail_area = Some(popup_rect);
    app.detail_favorite_area = Some(favorite_area);
}

/// Renders the status bar: shortcuts, the current status, countdown and version.
fn render_status_bar(f: &mut Frame, app: &mut AppState, area: Rect) {
    let area = Rect::new(
        area.x + 1,
        area.y,
        area.width.saturating_sub(2),
        area.height,
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(35),
            Constraint::Percentage(30),
        ])
        .split(area);

    let key_style = app.theme.title;
    let bar_style = app.theme.text.add_modifier(Modifier::DIM);

    let shortcuts = Line::from(vec![
        Span::styled("1-5 ", key_style),
        Span::raw("tabs  "),
        Span::styled("? ", key_style),
        Span::raw("help  "),
        Span::styled("q ", key_style),
        Span::raw("quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts)
            .style(bar_style)
            .alignment(Alignment::Left),
        chunks[0],
    );

    let status = match (&app.status_message, app.status(app.active_tab)) {
        (Some(message), _) => message.clone(),
        (None, LoadStatus::Loading) => "Loading...".to_string(),
        (None, _) => String::new(),
    };
    f.render_widget(
        Paragraph::new(status)
            .style(bar_style)
            .alignment(Alignment::Center),
        chunks[1],
    );

    let right = format!(
        "{} | {}",
        countdown::format_countdown(Utc::now()),
        app.app_version
    );
    f.render_widget(
        Paragraph::new(right)
            .style(bar_style)
            .alignment(Alignment::Right),
        chunks[2],
    );
}

fn render_help_overlay(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let popup_width = area.width.min(76).saturating_sub(4);
    let popup_height = 26.min(area.height.saturating_sub(2));
    if popup_width == 0 || popup_height == 0 {
        return;
    }
    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(" Help ")
        .border_type(BorderType::Double)
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let key_style = app.theme.title;
    let desc_style = app.theme.text;
    let header_style = key_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);

    let format_section = |title: &str, items: Vec<(&str, &str)>| -> Vec<Line<'static>> {
        let mut lines = vec![Line::from(Span::styled(title.to_string(), header_style))];
        for (key, desc) in items {
            lines.push(Line::from(vec![
                Span::styled(format!("{: <18}", key), key_style),
                Span::styled(desc.to_string(), desc_style),
            ]));
        }
        lines
    };

    let mut lines = format_section(
        "Navigation",
        vec![
            ("1-5 | Tab", "switch tab"),
            ("Left | Right", "previous | next tab"),
            ("Up | Down", "move selection"),
            ("Enter | Click", "open item / load more"),
            ("Space | Click ♡", "toggle wishlist"),
            ("Ctrl+R", "reload current tab"),
            ("q", "quit"),
        ],
    );
    lines.push(Line::from(""));
    lines.extend(format_section(
        "All Cosmetics",
        vec![
            ("/ or type", "filter by name"),
            ("Ctrl+T", "cycle type"),
            ("Ctrl+O", "cycle sort order"),
        ],
    ));
    lines.push(Line::from(""));
    lines.extend(format_section(
        "Text input",
        vec![
            ("Ctrl+U", "clear"),
            ("Ctrl+W", "delete word"),
            ("Ctrl+A | E", "start | end of line"),
            ("Enter | Esc", "submit | leave"),
        ],
    ));

    f.render_widget(Paragraph::new(lines), inner_area.inner(Margin::new(1, 1)));
}

fn render_progress_modal(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let stages_len = app.progress_stages.len().max(1) as u16;
    let popup_width = area.width.min(68).saturating_sub(4);
    let popup_height = area.height.saturating_sub(2).min(stages_len + 4);
    if popup_width == 0 || popup_height == 0 {
        return;
    }

    let popup_rect = Rect::new(
        area.x + (area.width.saturating_sub(popup_width)) / 2,
        area.y + (area.height.saturating_sub(popup_height)) / 2,
        popup_width,
        popup_height,
    );

    f.render_widget(Clear, popup_rect);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_selected)
        .style(app.theme.text)
        .title(format!(" {} ", app.progress_title))
        .title_style(app.theme.title);

    let inner_area = block.inner(popup_rect);
    f.render_widget(block, popup_rect);

    let content_area = inner_area.inner(Margin::new(1, 1));
    if content_area.width == 0 || content_area.height == 0 {
        return;
    }

    let min_gauge_width = 10u16;
    let percent_width = 4u16;
    let mut label_width = app
        .progress_stages
        .iter()
        .map(|stage| stage.label.width())
        .max()
        .unwrap_or(0) as u16;
    if content_area.width <= min_gauge_width {
        label_width = 0;
    } else {
        let max_label = content_area
            .width
            .saturating_sub(min_gauge_width + percent_width + 2);
        label_width = label_width.min(max_label);
    }
    let gap = if label_width > 0 { 1 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(1); stages_len as usize])
        .split(content_area);

    for (idx, row) in chunks.iter().enumerate() {
        let (label, ratio) = app
            .progress_stages
            .get(idx)
            .map(|stage| (stage.label.as_str(), stage.ratio))
            .unwrap_or(("Working", 0.0));
        let ratio = ratio.clamp(0.0, 1.0);
        let row_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(label_width),
                Constraint::Length(gap),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(percent_width),
            ])
            .split(*row);

        if label_width > 0 {
            f.render_widget(
                Paragraph::new(label.to_string()).style(app.theme.text),
                row_chunks[0],
            );
        }

        let gauge = LineGauge::default()
            .filled_style(app.theme.title)
            .unfilled_style(app.theme.border)
            .ratio(ratio)
            .label("");
        f.render_widget(gauge, row_chunks[2]);

        f.render_widget(
            Paragraph::new(format!("{:.0}%", ratio * 100.0))
                .style(app.theme.text)
                .alignment(Alignment::Right),
            row_chunks[4],
        );
    }
}

/// Calculates the terminal cell width offset for a given character index.
/// Uses `unicode-width` to correctly handle multibyte and multi-cell characters.
pub fn input_cursor_offset(text: &str, cursor: usize) -> u16 {
    text.chars()
        .take(cursor)
        .filter_map(|c| c.width())
        .map(|w| w as u16)
        .sum::<u16>()
}

/// Horizontal viewport offset that keeps the cursor visible in the input.
pub fn input_horizontal_scroll(text: &str, cursor: usize, visible_width: u16) -> u16 {
    if visible_width == 0 {
        return 0;
    }
    let cursor_offset = input_cursor_offset(text, cursor);
    cursor_offset.saturating_sub(visible_width.saturating_sub(1))
}

pub fn input_cursor_for_column(text: &str, target_column: u16) -> usize {
    let mut width = 0u16;
    for (idx, ch) in text.chars().enumerate() {
        let char_width = ch.width().unwrap_or(0) as u16;
        if width + char_width > target_column {
            return idx;
        }
        width += char_width;
    }
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_core::state::test_support::{app_with_catalog, app_with_shop, make_app};
    use crate::stats::{StatRow, StatsCard};
    use ratatui::{Terminal, backend::TestBackend, buffer::Buffer};

    fn draw(app: &mut AppState) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_shop_tab_renders_sections_and_hitboxes() {
        let mut app = app_with_shop();
        let text = buffer_text(&draw(&mut app));

        assert!(text.contains("── Featured ──"));
        assert!(text.contains("Bravo"));
        assert!(text.contains("Not in shop"));
        assert_eq!(app.tab_hitboxes.len(), Tab::ALL.len());
        assert!(app.list_content_area.is_some());
        assert!(app.filter_area.is_none());
    }

    #[test]
    fn test_catalog_renders_filter_and_load_more() {
        let mut app = app_with_catalog(60);
        app.activate_tab(Tab::Catalog);
        app.select_last();
        let text = buffer_text(&draw(&mut app));

        assert!(text.contains("All Cosmetics (50/60)"));
        assert!(text.contains("Type: All types"));
        assert!(text.contains("Load more (10 remaining)"));
        assert!(app.filter_input_area.is_some());
    }

    #[test]
    fn test_failed_tab_shows_message() {
        let mut app = make_app();
        app.set_status(Tab::Shop, LoadStatus::Failed("Error loading shop.".to_string()));
        let text = buffer_text(&draw(&mut app));
        assert!(text.contains("Error loading shop."));
    }

    #[test]
    fn test_detail_modal_records_hit_areas() {
        let mut app = app_with_shop();
        app.activate_selected();
        let text = buffer_text(&draw(&mut app));

        assert!(text.contains("Add to wishlist"));
        let detail = app.detail_area.unwrap();
        let favorite = app.detail_favorite_area.unwrap();
        assert!(detail.contains(favorite.as_position()));

        app.close_detail();
        draw(&mut app);
        assert!(app.detail_area.is_none());
    }

    #[test]
    fn test_stats_report_renders_cards() {
        let mut app = make_app();
        app.activate_tab(Tab::Stats);
        app.stats_view = StatsView::Report(StatsReport {
            player: "ninja".to_string(),
            battle_pass_level: 42,
            battle_pass_progress: 10,
            cards: vec![StatsCard {
                title: "SOLO",
                rows: vec![StatRow {
                    label: "Wins",
                    value: "12".to_string(),
                }],
            }],
        });
        let text = buffer_text(&draw(&mut app));

        assert!(text.contains("Battle Pass Level: 42"));
        assert!(text.contains("SOLO"));
        assert!(app.player_input_area.is_some());
        assert!(app.stats_area.is_some());
    }

    #[test]
    fn test_format_vbucks_groups_thousands() {
        assert_eq!(format_vbucks(800), "800");
        assert_eq!(format_vbucks(1500), "1,500");
        assert_eq!(format_vbucks(1234567), "1,234,567");
    }

    #[test]
    fn test_input_horizontal_scroll_keeps_cursor_visible() {
        let text = "abcdefghijklmnopqrstuvwxyz";

        assert_eq!(input_horizontal_scroll(text, 0, 10), 0);
        assert_eq!(input_horizontal_scroll(text, 9, 10), 0);
        assert_eq!(input_horizontal_scroll(text, 10, 10), 1);
        assert_eq!(input_horizontal_scroll(text, 15, 10), 6);
    }

    #[test]
    fn test_input_horizontal_scroll_handles_wide_characters() {
        let text = "🦀rust";

        assert_eq!(input_horizontal_scroll(text, 1, 2), 1);
        assert_eq!(input_horizontal_scroll(text, 2, 3), 1);
        assert_eq!(input_horizontal_scroll(text, 5, 4), 3);
    }

    #[test]
    fn test_input_cursor_for_column() {
        assert_eq!(input_cursor_for_column("abc", 0), 0);
        assert_eq!(input_cursor_for_column("abc", 50), 3);
        assert_eq!(input_cursor_for_column("🦀a", 1), 0);
        assert_eq!(input_cursor_for_column("🦀a", 2), 1);
    }
}
