//! Main UI renderer

use chrono::Utc;
use ratatui::prelude::*;
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, Paragraph, Row, Table,
    TableState, Wrap,
};

use crate::core::Section;
use crate::models::{format_money, Chart, Listing, Overview, ScreenFilter, StatCard};
use crate::tui::app::App;
use crate::tui::screens::add_product::{AddProductScreen, FormField};
use crate::tui::screens::category_editor::{CategoryEditor, EditorField};
use crate::tui::screens::listing::ListScreen;
use crate::tui::theme::Theme;

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(0)])
        .split(chunks[1]);

    render_sidebar(frame, body[0], app);
    render_content(frame, body[1], app);
    render_status_bar(frame, chunks[2], app);

    if let Some(editor) = &app.category_editor {
        render_category_editor(frame, editor);
    }

    if let Some(popup) = &app.error_popup {
        render_error_popup(frame, &popup.title, &popup.message);
    }

    // Render help overlay on top if active
    if app.show_help {
        render_help_overlay(frame, app);
    }
}

/// Render the header
fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let backend = app.config.api_base_url.trim_end_matches('/');
    let title = format!(
        " marketdesk │ {} │ {} ",
        app.current_screen.title(),
        backend
    );

    let header = Paragraph::new(title)
        .style(Theme::header())
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

fn render_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = Section::all()
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let item = ListItem::new(format!(" [{}] {}", i + 1, section.title()));
            if i == app.sidebar.selected {
                item.style(Theme::selected())
            } else {
                item
            }
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Menu ")
            .borders(Borders::ALL)
            .border_style(Theme::normal()),
    );

    frame.render_widget(list, area);
}

/// Render the main content area based on current screen
fn render_content(frame: &mut Frame, area: Rect, app: &App) {
    match app.current_screen {
        Section::Overview => render_overview(frame, area, app),
        Section::Customers => render_listing(frame, area, &app.users),
        Section::Orders => render_listing(frame, area, &app.orders),
        Section::Products => render_listing(frame, area, &app.products),
        Section::Categories => render_listing(frame, area, &app.categories),
        Section::Promotions => render_listing(frame, area, &app.promotions),
        Section::AddProduct => render_add_product(frame, area, app),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Record screens
// ─────────────────────────────────────────────────────────────────────────────

fn render_listing<R: Listing>(frame: &mut Frame, area: Rect, screen: &ListScreen<R>) {
    let now = Utc::now();
    let records = screen.view.all();
    let cards = R::stat_cards(records, now);
    let charts = R::charts(records, now);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(if cards.is_empty() { 0 } else { 4 }),
            Constraint::Length(if charts.is_empty() { 0 } else { 10 }),
            Constraint::Length(1), // Filter bar
            Constraint::Min(5),    // Table
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    render_stat_cards(frame, chunks[0], &cards);
    render_charts(frame, chunks[1], &charts);
    render_filter_bar(frame, chunks[2], screen);
    render_table(frame, chunks[3], screen);

    let help = Paragraph::new(
        " j/k: move  /: search  c: control  f: filter  s: sort  x: clear  n: new  e: edit  d: delete",
    )
    .style(Theme::muted());
    frame.render_widget(help, chunks[4]);

    if let Some(id) = &screen.confirm_delete {
        render_confirm_delete(frame, R::KIND, id);
    }
}

fn render_stat_cards(frame: &mut Frame, area: Rect, cards: &[StatCard]) {
    if cards.is_empty() || area.height == 0 {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, cards.len() as u32); cards.len()];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, slot) in cards.iter().zip(slots.iter()) {
        let value = Paragraph::new(Line::from(Span::styled(
            card.value.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .title(format!(" {} ", card.title))
                .borders(Borders::ALL)
                .border_style(Theme::muted()),
        );
        frame.render_widget(value, *slot);
    }
}

fn render_charts(frame: &mut Frame, area: Rect, charts: &[Chart]) {
    if charts.is_empty() || area.height == 0 {
        return;
    }
    let constraints = vec![Constraint::Ratio(1, charts.len() as u32); charts.len()];
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (chart, slot) in charts.iter().zip(slots.iter()) {
        let bars: Vec<Bar> = chart
            .tally
            .iter()
            .map(|(label, count)| {
                Bar::default()
                    .value(count as u64)
                    .label(Line::from(label.to_string()))
            })
            .collect();
        render_bars(frame, *slot, chart.title, &bars);
    }
}

fn render_bars(frame: &mut Frame, area: Rect, title: &str, bars: &[Bar]) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL);

    if bars.is_empty() {
        let empty = Paragraph::new("  (no data)").style(Theme::muted()).block(block);
        frame.render_widget(empty, area);
        return;
    }

    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width / bars.len() as u16).saturating_sub(1).clamp(1, 12);

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .bar_style(Style::default().fg(Theme::PRIMARY))
        .value_style(Theme::selected());

    frame.render_widget(chart, area);
}

fn render_filter_bar<R: Listing>(frame: &mut Frame, area: Rect, screen: &ListScreen<R>) {
    let search = screen.filter.search().text();
    let search_style = if screen.searching {
        Theme::focused()
    } else {
        Theme::normal()
    };
    let cursor = if screen.searching { "_" } else { "" };

    let mut spans = vec![
        Span::styled(" Search: ", Theme::muted()),
        Span::styled(format!("{}{}", search, cursor), search_style),
    ];

    for (i, (name, value)) in screen.filter.controls().into_iter().enumerate() {
        let style = if i == screen.control {
            Theme::focused()
        } else {
            Theme::normal()
        };
        spans.push(Span::styled(format!("  {}: ", name), Theme::muted()));
        spans.push(Span::styled(value, style));
    }

    spans.push(Span::styled("  Sort: ", Theme::muted()));
    spans.push(Span::raw(screen.sort_label()));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table<R: Listing>(frame: &mut Frame, area: Rect, screen: &ListScreen<R>) {
    let rows = screen.rows();
    let block = Block::default()
        .title(format!(
            " {} ({} of {}) ",
            R::TITLE,
            rows.len(),
            screen.view.len()
        ))
        .borders(Borders::ALL);

    if let Some(error) = &screen.error {
        let paragraph = Paragraph::new(format!("\n  {}", error))
            .style(Theme::error())
            .wrap(Wrap { trim: false })
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    if rows.is_empty() {
        let message = if screen.view.is_empty() {
            format!("\n  No {} records.", R::KIND)
        } else {
            format!("\n  No {} records match the current filters.", R::KIND)
        };
        frame.render_widget(Paragraph::new(message).style(Theme::muted()).block(block), area);
        return;
    }

    let header = Row::new(R::HEADERS.iter().copied())
        .style(Theme::header().add_modifier(Modifier::BOLD));
    let widths: Vec<Constraint> = R::WIDTHS
        .iter()
        .map(|w| Constraint::Percentage(*w))
        .collect();
    let body: Vec<Row> = rows.iter().map(|record| Row::new(record.cells())).collect();

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Theme::selected())
        .highlight_symbol("▶ ");

    let mut state = TableState::default().with_selected(Some(screen.selection.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn render_confirm_delete(frame: &mut Frame, kind: &str, id: &str) {
    let area = centered_rect(frame.area(), 50, 5);
    frame.render_widget(Clear, area);

    let text = vec![
        Line::from(format!(" Delete {} {}?", kind, id)),
        Line::from(Span::styled(" [y] Delete   [n] Cancel", Theme::muted())),
    ];
    let popup = Paragraph::new(text).block(
        Block::default()
            .title(" Confirm ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Theme::WARNING)),
    );
    frame.render_widget(popup, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Overview
// ─────────────────────────────────────────────────────────────────────────────

fn render_overview(frame: &mut Frame, area: Rect, app: &App) {
    let Some(overview) = &app.overview else {
        let message = app
            .overview_error
            .clone()
            .unwrap_or_else(|| "Loading...".to_string());
        let paragraph = Paragraph::new(format!("\n  {}", message))
            .style(Theme::error())
            .block(Block::default().title(" Overview ").borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(14),
            Constraint::Min(5),
        ])
        .split(area);

    render_headlines(frame, chunks[0], overview);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(chunks[1]);
    render_sales(frame, middle[0], overview);
    render_audience(frame, middle[1], overview);

    render_newest_products(frame, chunks[2], overview);
}

fn render_headlines(frame: &mut Frame, area: Rect, overview: &Overview) {
    if overview.headlines.is_empty() {
        return;
    }
    let count = overview.headlines.len();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, count as u32); count])
        .split(area);

    for (headline, slot) in overview.headlines.iter().zip(slots.iter()) {
        let arrow = if headline.increasing { "↑" } else { "↓" };
        let text = vec![
            Line::from(Span::styled(
                headline.value.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                format!("{} {}", arrow, headline.change),
                Theme::trend(headline.increasing),
            )),
        ];
        let card = Paragraph::new(text).block(
            Block::default()
                .title(format!(" {} ", headline.title))
                .borders(Borders::ALL)
                .border_style(Theme::muted()),
        );
        frame.render_widget(card, *slot);
    }
}

fn render_sales(frame: &mut Frame, area: Rect, overview: &Overview) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(2)])
        .split(area);

    let bars: Vec<Bar> = overview
        .sales
        .iter()
        .map(|point| {
            Bar::default()
                .value(point.value.max(0.0).round() as u64)
                .label(Line::from(point.label.clone()))
        })
        .collect();
    render_bars(frame, chunks[0], "Sales", &bars);

    let latest = overview
        .sales
        .iter()
        .zip(overview.sales_changes())
        .filter_map(|(point, change)| change.map(|c| (point, c)))
        .last();

    let mut spans = vec![Span::styled(
        format!(" Total: {}", format_money("$", overview.total_sales())),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some((point, change)) = latest {
        spans.push(Span::styled(format!("   {}: ", point.label), Theme::muted()));
        spans.push(Span::styled(change.label(), Theme::trend(change.is_increase())));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), chunks[1]);
}

fn render_audience(frame: &mut Frame, area: Rect, overview: &Overview) {
    let width = area.width.saturating_sub(22) as f64;
    let lines: Vec<Line> = overview
        .audience_shares()
        .into_iter()
        .map(|(label, share)| {
            let filled = (share / 100.0 * width).round() as usize;
            Line::from(vec![
                Span::raw(format!(" {:<10}", label)),
                Span::styled("█".repeat(filled), Style::default().fg(Theme::PRIMARY)),
                Span::raw(format!(" {:.1}%", share)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Audience ")
            .borders(Borders::ALL),
    );
    frame.render_widget(paragraph, area);
}

fn render_newest_products(frame: &mut Frame, area: Rect, overview: &Overview) {
    let header = Row::new(["Name", "Status", "Price", "Created"])
        .style(Theme::header().add_modifier(Modifier::BOLD));
    let rows: Vec<Row> = overview
        .newest_products
        .iter()
        .map(|product| {
            Row::new(vec![
                Line::from(product.name.clone()),
                Line::styled(
                    product.status.label(),
                    Theme::listing_status(product.status),
                ),
                Line::from(format_money("$", product.price)),
                Line::from(product.created.format("%b %-d, %Y").to_string()),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" Newest Products ")
            .borders(Borders::ALL),
    );
    frame.render_widget(table, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Add product
// ─────────────────────────────────────────────────────────────────────────────

fn render_add_product(frame: &mut Frame, area: Rect, app: &App) {
    let screen = &app.add_product;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(12),   // Form
            Constraint::Length(4), // Payment panel
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    let busy = app.is_busy();
    let spinner = SPINNER[app.tick_counter % SPINNER.len()];

    let mut lines: Vec<Line> = Vec::new();
    if screen.loading {
        lines.push(Line::from(Span::styled(
            format!(" {} Loading categories and promotion plans...", spinner),
            Theme::muted(),
        )));
    }
    if let Some(error) = &screen.error {
        lines.push(Line::from(Span::styled(format!(" {}", error), Theme::error())));
    }
    lines.push(Line::from(""));

    for field in FormField::ALL {
        let focused = *field == screen.field;
        let marker = if focused { "▶ " } else { "  " };
        let label_style = if focused {
            Theme::focused()
        } else {
            Theme::muted()
        };

        if *field == FormField::Submit {
            lines.push(Line::from(""));
            let (text, style) = if busy {
                (format!("  {} Submitting...", spinner), Theme::muted())
            } else if focused {
                ("  [ Submit ]".to_string(), Theme::selected())
            } else {
                ("  [ Submit ]".to_string(), Theme::normal())
            };
            lines.push(Line::from(vec![Span::raw(marker), Span::styled(text, style)]));
            continue;
        }

        lines.push(form_line(screen, *field, marker, label_style, focused));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .title(" Add Product ")
            .borders(Borders::ALL),
    );
    frame.render_widget(form, chunks[0]);

    render_payment_panel(frame, chunks[1], app);

    let help = Paragraph::new(
        " Tab/↑↓: field  ←/→/Space: choose  Enter: next/add image  p: payment return  r: reload  Esc: back",
    )
    .style(Theme::muted());
    frame.render_widget(help, chunks[2]);
}

fn form_line(
    screen: &AddProductScreen,
    field: FormField,
    marker: &'static str,
    label_style: Style,
    focused: bool,
) -> Line<'static> {
    let mut value = screen.value(field);
    if focused && field.is_text() {
        value.push('_');
    }
    let mut spans = vec![
        Span::raw(marker),
        Span::styled(format!("{:<12}", field.label()), label_style),
    ];

    match field {
        FormField::Images => {
            spans.push(Span::raw(format!("[{}] ", screen.image_count_label())));
            let names: Vec<String> = screen
                .form
                .images
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            if !names.is_empty() {
                spans.push(Span::styled(format!("{}  ", names.join(", ")), Theme::muted()));
            }
            spans.push(Span::raw(value));
        }
        FormField::Condition | FormField::Category | FormField::Subcategory | FormField::Promotion => {
            spans.push(Span::raw(format!("‹ {} ›", value)));
        }
        _ => spans.push(Span::raw(value)),
    }

    Line::from(spans)
}

fn render_payment_panel(frame: &mut Frame, area: Rect, app: &App) {
    let screen = &app.add_product;
    let mut lines = Vec::new();

    if let Some(input) = &screen.return_input {
        lines.push(Line::from(Span::styled(
            " Paste the payment return URL and press Enter (Esc to cancel):",
            Theme::muted(),
        )));
        lines.push(Line::from(Span::styled(format!(" {}_", input), Theme::focused())));
    } else if let Some(url) = &screen.authorization_url {
        lines.push(Line::from(Span::styled(" Complete payment at:", Theme::muted())));
        lines.push(Line::from(Span::raw(format!(" {}", url))));
    } else if let Some(id) = app.session.pending_product() {
        lines.push(Line::from(Span::styled(
            format!(" Product {} is awaiting payment. Press [p] to paste the return URL.", id),
            Style::default().fg(Theme::WARNING),
        )));
    } else {
        lines.push(Line::from(Span::styled(" No payment pending.", Theme::muted())));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Payment ").borders(Borders::ALL));
    frame.render_widget(panel, area);
}

// ─────────────────────────────────────────────────────────────────────────────
// Popups
// ─────────────────────────────────────────────────────────────────────────────

fn render_category_editor(frame: &mut Frame, editor: &CategoryEditor) {
    let area = centered_rect(frame.area(), 60, 14);
    frame.render_widget(Clear, area);

    let style_for = |field: EditorField| {
        if editor.field == field {
            Theme::focused()
        } else {
            Theme::muted()
        }
    };
    let cursor_for = |field: EditorField| if editor.field == field { "_" } else { "" };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Name:           ", style_for(EditorField::Name)),
            Span::raw(format!("{}{}", editor.draft.name, cursor_for(EditorField::Name))),
        ]),
        Line::from(vec![
            Span::styled(" Image:          ", style_for(EditorField::Image)),
            Span::raw(format!("{}{}", editor.draft.image, cursor_for(EditorField::Image))),
        ]),
        Line::from(vec![
            Span::styled(" Subcategories:  ", style_for(EditorField::Subcategories)),
            Span::raw(format!(
                "{}{}",
                editor.subcategory_input,
                cursor_for(EditorField::Subcategories)
            )),
        ]),
    ];

    if editor.draft.subcategories.is_empty() {
        lines.push(Line::from(Span::styled("   (none)", Theme::muted())));
    } else {
        lines.push(Line::from(format!(
            "   {}",
            editor.draft.subcategories.join(", ")
        )));
    }

    lines.push(Line::from(""));
    if let Some(error) = &editor.error {
        lines.push(Line::from(Span::styled(format!(" {}", error), Theme::error())));
    }
    lines.push(Line::from(Span::styled(
        " Tab: field  Enter: add subcategory  Ctrl+S: save  Esc: cancel",
        Theme::muted(),
    )));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!(" {} ", editor.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Theme::PRIMARY)),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(popup, area);
}

fn render_error_popup(frame: &mut Frame, title: &str, message: &str) {
    let area = centered_rect(frame.area(), 60, 12);
    frame.render_widget(Clear, area);

    let mut lines: Vec<Line> = message
        .lines()
        .map(|line| Line::from(format!(" {}", line)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(" Press Enter or Esc to dismiss", Theme::muted())));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Theme::error()),
        )
        .style(Style::default().bg(Color::Black));
    frame.render_widget(popup, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let status_text = if let Some(msg) = &app.status_message {
        format!(" {}", msg)
    } else {
        let session = match (app.session.is_logged_in(), app.session.email()) {
            (true, Some(email)) => format!("Signed in as {}", email),
            (true, None) => "Signed in".to_string(),
            (false, _) => "Not logged in".to_string(),
        };
        format!(" {} │ ? for help ", session)
    };

    let status = Paragraph::new(status_text)
        .style(Theme::status_bar())
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(status, area);
}

/// Render the help overlay
fn render_help_overlay(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Calculate centered popup area (60% width, 70% height)
    let popup_width = (area.width * 60 / 100).min(60);
    let popup_height = (area.height * 70 / 100).min(22);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let (title, help_lines) = get_help_content(app.current_screen);

    let text: Vec<Line> = help_lines
        .into_iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("  {:12}", key), Style::default().fg(Color::Cyan)),
                Span::raw(desc),
            ])
        })
        .collect();

    let help = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help, popup_area);
}

/// Get help content for the current screen
fn get_help_content(screen: Section) -> (&'static str, Vec<(&'static str, &'static str)>) {
    let mut list_keys = vec![
        ("j / ↓", "Move down"),
        ("k / ↑", "Move up"),
        ("/", "Search"),
        ("c", "Focus next filter"),
        ("f", "Cycle focused filter"),
        ("s", "Cycle sort order"),
        ("x", "Clear filters and sort"),
        ("d", "Delete selected"),
    ];
    let navigation = [
        ("1-7", "Jump to section"),
        ("[ / ]", "Previous / next section"),
        ("Esc", "Go back"),
        ("q", "Quit"),
        ("?", "Show this help"),
    ];

    match screen {
        Section::Overview => (
            "Help - Overview",
            [("r", "Reload overview")].into_iter().chain(navigation).collect(),
        ),
        Section::Categories => {
            list_keys.push(("n", "Add category"));
            list_keys.push(("e / Enter", "Edit category"));
            list_keys.extend(navigation);
            ("Help - Categories", list_keys)
        }
        Section::Products => {
            list_keys.push(("n", "Add product"));
            list_keys.extend(navigation);
            ("Help - Products", list_keys)
        }
        Section::Customers | Section::Orders | Section::Promotions => {
            list_keys.extend(navigation);
            ("Help - Records", list_keys)
        }
        Section::AddProduct => (
            "Help - Add Product",
            vec![
                ("Tab", "Next field"),
                ("Shift+Tab", "Previous field"),
                ("← / →", "Choose option"),
                ("Enter", "Add image / Submit"),
                ("Backspace", "Delete / remove image"),
                ("p", "Paste payment return URL"),
                ("r", "Reload categories"),
                ("Esc", "Go back"),
            ],
        ),
    }
}

/// A rect of `percent_x` width and fixed `height`, centered in `area`
fn centered_rect(area: Rect, percent_x: u16, height: u16) -> Rect {
    let width = (area.width * percent_x / 100).max(20).min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Config, SessionContext};
    use crate::data::DataSource;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(140, 50);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>()
    }

    fn app() -> App {
        App::new(Config::default(), DataSource::bundled(), SessionContext::in_memory())
    }

    #[test]
    fn test_centered_rect_fits_area() {
        let area = Rect::new(0, 0, 100, 10);
        let rect = centered_rect(area, 50, 20);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 25);
    }

    #[tokio::test]
    async fn test_renders_overview_and_sidebar() {
        let app = app();
        let screen = draw(&app);
        assert!(screen.contains("Newest Products"));
        assert!(screen.contains("[3] Orders"));
        assert!(screen.contains("Not logged in"));
    }

    #[tokio::test]
    async fn test_renders_record_screen() {
        let mut app = app();
        app.navigate_to(Section::Customers);
        let screen = draw(&app);
        assert!(screen.contains("Customer Management"));
        assert!(screen.contains("Sort:"));
    }

    #[test]
    fn test_help_lists_navigation_for_every_section() {
        for section in Section::all() {
            let (_, keys) = get_help_content(*section);
            assert!(!keys.is_empty());
        }
        let (_, keys) = get_help_content(Section::Categories);
        assert!(keys.iter().any(|(k, _)| *k == "n"));
    }
}
