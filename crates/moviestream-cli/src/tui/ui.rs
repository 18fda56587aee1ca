//! TUI rendering for the catalog browser and the player dialog.

use moviestream_api::catalog::{CatalogItem, Category, ContentType, RatingBand};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Tabs, Wrap,
};

use super::state::{BrowserState, DialogFocus, InputMode};
use crate::browse::CatalogView;
use crate::browse::controller::BrowseController;
use crate::browse::player::PlayerState;

/// Shown while the first page is in flight.
pub const LOADING_TEXT: &str = "Loading...";

/// Everything the renderer reads from the runtime.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    /// Catalog state.
    pub controller: &'a BrowseController,
    /// Open player dialog.
    pub player: Option<&'a PlayerState>,
    /// Current location string.
    pub location: &'a str,
}

/// Message for an empty result list.
#[must_use]
pub fn empty_message(category: Category, searching: bool) -> String {
    let noun = match category.content_type() {
        ContentType::Movie => "movies",
        ContentType::Tv => "TV shows",
    };
    if searching {
        format!("No {noun} match your search query.")
    } else {
        format!("No {noun} available.")
    }
}

/// Text colour for a rating.
#[must_use]
pub const fn rating_color(band: RatingBand) -> Color {
    match band {
        RatingBand::High => Color::Green,
        RatingBand::Mid => Color::Yellow,
        RatingBand::Low => Color::Red,
    }
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, screen: Screen<'_>, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // results
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], screen, state);
    draw_results(frame, chunks[1], screen, state);
    draw_footer(frame, chunks[2], screen, state);

    if let Some(player) = screen.player {
        draw_player(frame, player, state.dialog_focus);
    }
}

/// Draws category tabs and the search box.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, screen: Screen<'_>, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let active = screen.controller.category();
    let titles: Vec<Line> = Category::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{} {}", i.saturating_add(1), c.label())))
        .collect();
    let selected = Category::ALL.iter().position(|c| *c == active).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(highlight_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" MovieStream "),
        );
    frame.render_widget(tabs, header_chunks[0]);

    let search_style = if state.input_mode == InputMode::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(screen.controller.search_query().to_owned())
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Search: / ({}) ", screen.location)),
        );
    frame.render_widget(search, header_chunks[1]);
}

/// Draws the result area in one of its exclusive states.
fn draw_results(frame: &mut Frame, area: Rect, screen: Screen<'_>, state: &mut BrowserState) {
    let controller = screen.controller;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", controller.category().label()));

    match controller.view() {
        CatalogView::Loading => {
            let loading = Paragraph::new(LOADING_TEXT).block(block);
            frame.render_widget(loading, area);
        }
        CatalogView::Error(message) => {
            let error = Paragraph::new(format!("Error: {message}"))
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(error, area);
        }
        CatalogView::Empty { searching } => {
            let empty =
                Paragraph::new(empty_message(controller.category(), searching)).block(block);
            frame.render_widget(empty, area);
        }
        CatalogView::Items(items) => {
            let rows: Vec<Row> = items.iter().map(item_row).collect();
            let table = Table::new(
                rows,
                [
                    Constraint::Min(20),
                    Constraint::Length(6),
                    Constraint::Length(6),
                    Constraint::Length(5),
                ],
            )
            .header(
                Row::new(vec!["Title", "Year", "Rating", "Type"])
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            )
            .row_highlight_style(highlight_style())
            .highlight_symbol("\u{25b8} ")
            .block(block);
            frame.render_stateful_widget(table, area, &mut state.table_state);
        }
    }
}

fn item_row(item: &CatalogItem) -> Row<'static> {
    let year = item
        .release_year()
        .map_or_else(|| String::from("-"), |y| y.to_string());
    Row::new(vec![
        Cell::from(item.display_title().to_owned()),
        Cell::from(year),
        Cell::from(format!("{:.1}", item.rating))
            .style(Style::default().fg(rating_color(item.rating_band()))),
        Cell::from(item.media_type.as_str()),
    ])
}

/// Draws the footer with key hints and pagination status.
fn draw_footer(frame: &mut Frame, area: Rect, screen: Screen<'_>, state: &BrowserState) {
    let controller = screen.controller;
    let help_text = if screen.player.is_some() {
        "Esc: close  Tab: focus  h/l: season  j/k: move  Enter/o: open in browser"
    } else if state.input_mode == InputMode::Search {
        "Type to search | Esc: clear search | Enter: done"
    } else {
        "1/2/3/Tab: category  /: search  \u{2191}\u{2193}/j/k: move  Enter: play  m: load more  [/]: back/forward  q: quit"
    };

    let page_text = if controller.is_loading_more() {
        format!("Page {} | Loading more...", controller.page())
    } else if controller.has_more() && !controller.items().is_empty() {
        format!("Page {} | more available", controller.page())
    } else {
        format!("Page {}", controller.page())
    };

    let mut spans = vec![
        Span::styled(page_text, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
    ];
    if let Some(status) = state.status.as_deref() {
        let status_style = Style::default().fg(Color::Yellow);
        spans.push(Span::styled(status.to_owned(), status_style));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw(help_text));

    let footer =
        Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}

/// Draws the player dialog over the browser.
#[allow(clippy::indexing_slicing)]
fn draw_player(frame: &mut Frame, player: &PlayerState, focus: DialogFocus) {
    let area = centered_rect(80, 70, frame.area());
    frame.render_widget(Clear, area);

    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", player.item().display_title()));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(4),
        ])
        .split(inner);

    let poster = Paragraph::new(Line::from(vec![
        Span::styled("Poster: ", Style::default().fg(Color::DarkGray)),
        Span::raw(player.item().poster_url()),
    ]));
    frame.render_widget(poster, chunks[0]);

    match player.content_type() {
        ContentType::Movie => {
            let overview = Paragraph::new(player.item().overview.clone())
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Overview "));
            frame.render_widget(overview, chunks[1]);
        }
        ContentType::Tv => draw_selectors(frame, chunks[1], player, focus),
    }

    let (text, style) = if let Some(message) = player.error() {
        (String::from(message), Style::default().fg(Color::Red))
    } else if let Some(url) = player.embed_url() {
        (url, Style::default().fg(Color::Green))
    } else {
        (String::from(LOADING_TEXT), Style::default())
    };
    let embed = Paragraph::new(text)
        .style(style)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Stream "));
    frame.render_widget(embed, chunks[2]);
}

/// Draws the season and episode selectors side by side.
#[allow(clippy::indexing_slicing)]
fn draw_selectors(frame: &mut Frame, area: Rect, player: &PlayerState, focus: DialogFocus) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(area);

    let seasons: Vec<ListItem> = player
        .seasons()
        .iter()
        .map(|s| {
            selector_item(
                &format!("{} ({} ep)", s.name, s.episode_count),
                s.season_number == player.season(),
            )
        })
        .collect();
    let seasons_title = if player.is_loading_seasons() {
        String::from(" Seasons (loading) ")
    } else {
        String::from(" Seasons ")
    };
    let seasons_block = selector_block(seasons_title, focus == DialogFocus::Seasons);
    frame.render_widget(List::new(seasons).block(seasons_block), panes[0]);

    let episodes: Vec<ListItem> = player
        .episodes()
        .iter()
        .map(|e| {
            selector_item(
                &format!("{:>3}  {}", e.episode_number, e.name),
                e.episode_number == player.episode(),
            )
        })
        .collect();
    let episodes_title = if player.is_loading_episodes() {
        format!(" Season {} episodes (loading) ", player.season())
    } else {
        format!(" Season {} episodes ", player.season())
    };
    let episodes_block = selector_block(episodes_title, focus == DialogFocus::Episodes);
    frame.render_widget(List::new(episodes).block(episodes_block), panes[1]);
}

fn selector_item(label: &str, selected: bool) -> ListItem<'static> {
    let (marker, style) = if selected {
        ("\u{25b8} ", highlight_style())
    } else {
        ("  ", Style::default())
    };
    ListItem::new(Line::from(vec![
        Span::raw(marker),
        Span::styled(label.to_owned(), style),
    ]))
}

fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn selector_block(title: String, focused: bool) -> Block<'static> {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title)
}

/// Returns a rectangle of `percent_x` by `percent_y` centred in `area`.
#[allow(clippy::indexing_slicing)]
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let margin_y = 100_u16.saturating_sub(percent_y) / 2;
    let margin_x = 100_u16.saturating_sub(percent_x) / 2;
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(margin_y),
            Constraint::Percentage(percent_y),
            Constraint::Percentage(margin_y),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(margin_x),
            Constraint::Percentage(percent_x),
            Constraint::Percentage(margin_x),
        ])
        .split(rows[1])[1]
}
