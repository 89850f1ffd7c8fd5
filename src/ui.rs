//! UI rendering helpers for the terminal user interface.
//!
//! Everything here reads the `App` model; nothing mutates it.

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, PromptKind, View};
use crate::audio::{NoticeLevel, PlayerState, TransportState};
use crate::config::{Settings, TrackDisplayField};
use crate::library::{display_from_fields, format_time};

const LIST_FIELDS: [TrackDisplayField; 2] = [TrackDisplayField::Artist, TrackDisplayField::Title];

/// Render the controls help text.
fn controls_text(seek_seconds: u64) -> String {
    [
        "[j/k] move".to_string(),
        "[enter] play".to_string(),
        "[space] play/pause".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] seek -/+{seek_seconds}s"),
        "[-/+] volume".to_string(),
        "[s] shuffle".to_string(),
        "[r] repeat".to_string(),
        "[a] queue".to_string(),
        "[d] unqueue".to_string(),
        "[c] clear queue".to_string(),
        "[f] like".to_string(),
        "[n/e/x] new/rename/delete playlist".to_string(),
        "[A] add to playlist".to_string(),
        "[J/K] reorder".to_string(),
        "[P] play all".to_string(),
        "[esc] back".to_string(),
        "[tab] view".to_string(),
        "[/] filter".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn transport_symbol(state: &PlayerState) -> &'static str {
    match state.transport {
        TransportState::Playing => "▶",
        TransportState::Paused => "⏸",
        TransportState::Stopped => "■",
    }
}

fn mode_text(state: &PlayerState) -> String {
    format!(
        "vol {:>3}% | shuffle {} | repeat {}",
        (state.volume * 100.0).round() as u32,
        if state.shuffle_on { "on" } else { "off" },
        state.repeat_mode.label(),
    )
}

/// Render one full frame.
pub fn draw(f: &mut Frame, app: &App, settings: &Settings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app, settings);
    draw_list(f, chunks[1], app);
    draw_now_playing(f, chunks[2], &app.player, settings);
    draw_status(f, chunks[3], app, settings);

    let help = Paragraph::new(controls_text(settings.controls.seek_seconds)).dim();
    f.render_widget(help, chunks[4]);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, settings: &Settings) {
    let dir = app.current_dir.as_deref().unwrap_or("");
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            settings.ui.header_text.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  {dir}")),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn draw_list(f: &mut Frame, area: Rect, app: &App) {
    if app.view.lists_collections() {
        draw_entries(f, area, app);
        return;
    }

    let playing_id = app.player.current_track.as_ref().map(|t| t.id);
    let visible = app.visible();

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(pos, t)| {
            // In the queue view the entry position identifies the current track,
            // since the same track may be queued twice.
            let is_current = match app.view {
                View::Queue => Some(pos) == app.player.current_index,
                _ => Some(t.id) == playing_id,
            };
            let marker = if is_current { "♪ " } else { "  " };
            let like = if t.is_liked { " ♥" } else { "" };
            let line = format!(
                "{marker}{}{like}  {}",
                display_from_fields(t, &LIST_FIELDS, " - "),
                format_time(t.duration_secs as f64)
            );
            let mut item = ListItem::new(line);
            if is_current {
                item = item.style(Style::default().fg(Color::Cyan));
            }
            item
        })
        .collect();

    let title = if app.view == View::Library && !app.filter_query.is_empty() {
        format!(" {} /{} ({}) ", app.view_title(), app.filter_query, visible.len())
    } else {
        format!(" {} ({}) ", app.view_title(), visible.len())
    };
    render_list(f, area, items, title, app.selected);
}

fn draw_entries(f: &mut Frame, area: Rect, app: &App) {
    let entries = app.entries();
    let items: Vec<ListItem> = entries
        .iter()
        .map(|e| {
            let mut line = Line::from(vec![
                Span::raw(format!("  {}", e.name)),
                Span::styled(format!("  {}", e.detail), Style::default().dim()),
            ]);
            if app.view == View::Playlists && app.target_playlist == Some(e.id) {
                line.push_span(Span::styled(" +", Style::default().fg(Color::Cyan)));
            }
            ListItem::new(line)
        })
        .collect();

    let title = format!(" {} ({}) ", app.view_title(), entries.len());
    render_list(f, area, items, title, app.selected);
}

fn render_list(f: &mut Frame, area: Rect, items: Vec<ListItem>, title: String, selected: usize) {
    let empty = items.is_empty();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    if !empty {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_now_playing(f: &mut Frame, area: Rect, state: &PlayerState, settings: &Settings) {
    let block = Block::default().borders(Borders::ALL).title(" Now Playing ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let track_text = state
        .current_track
        .as_ref()
        .map(|t| {
            display_from_fields(
                t,
                &settings.ui.now_playing_fields,
                &settings.ui.now_playing_separator,
            )
        })
        .unwrap_or_else(|| "Nothing playing".to_string());

    let line = Line::from(vec![
        Span::raw(format!("{} ", transport_symbol(state))),
        Span::styled(track_text, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("   {}", mode_text(state))),
    ]);
    f.render_widget(Paragraph::new(line), rows[0]);

    let total = state.duration.map_or(0.0, |d| d.as_secs_f64());
    let label = format!(
        "{} / {}",
        format_time(state.elapsed.as_secs_f64()),
        format_time(total)
    );
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio((state.progress_percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, rows[1]);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App, settings: &Settings) {
    let ttl = std::time::Duration::from_secs(settings.ui.notice_seconds);
    let line = if let Some(prompt) = &app.prompt {
        let label = match prompt.kind {
            PromptKind::NewPlaylist => "New playlist",
            PromptKind::RenamePlaylist(_) => "Rename playlist",
        };
        Line::from(format!("{label}: {}", prompt.text))
    } else if app.filter_mode {
        Line::from(format!("/{}", app.filter_query))
    } else if let Some(n) = app.active_notice(Instant::now(), ttl) {
        let color = match n.level {
            NoticeLevel::Success => Color::Green,
            NoticeLevel::Error => Color::Red,
        };
        Line::from(Span::styled(n.message.clone(), Style::default().fg(color)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(line), area);
}
