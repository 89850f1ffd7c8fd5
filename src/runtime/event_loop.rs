use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::warn;

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer, Notice};
use crate::config;
use crate::error::CatalogError;
use crate::ui;

/// What the loop should do after a key press.
enum Flow {
    Continue,
    Quit,
}

/// Main terminal event loop: drains notices, syncs the player snapshot,
/// draws, and turns key presses into audio commands. Returns `Ok(())` when
/// the user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    audio_player: &AudioPlayer,
    notices: &Receiver<Notice>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = audio_player.state_handle();

    loop {
        while let Ok(n) = notices.try_recv() {
            app.set_notice(n, Instant::now());
        }

        if let Ok(s) = state.lock() {
            let snapshot = s.clone();
            drop(s);
            app.sync_player(snapshot);
        }

        terminal.draw(|f| ui::draw(f, app, settings))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let flow = if app.prompt.is_some() {
                    handle_prompt_key(app, key)
                } else if app.filter_mode {
                    handle_filter_key(app, audio_player, key)
                } else {
                    handle_key(app, audio_player, settings, key)
                };
                if let Flow::Quit = flow {
                    return Ok(());
                }
            }
        }
    }
}

fn send(audio_player: &AudioPlayer, cmd: AudioCmd) {
    if let Err(e) = audio_player.send(cmd) {
        warn!(error = %e, "audio thread is gone");
    }
}

/// Show the outcome of a catalog edit.
fn report(app: &mut App, result: Result<Option<Notice>, CatalogError>) {
    match result {
        Ok(Some(n)) => app.set_notice(n, Instant::now()),
        Ok(None) => {}
        Err(e) => {
            warn!(error = %e, "catalog update failed");
            app.set_notice(Notice::error(e.to_string()), Instant::now());
        }
    }
}

fn handle_prompt_key(app: &mut App, key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Enter => {
            let result = app.submit_prompt();
            report(app, result);
        }
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        _ => {}
    }
    Flow::Continue
}

fn handle_filter_key(app: &mut App, audio_player: &AudioPlayer, key: KeyEvent) -> Flow {
    match key.code {
        KeyCode::Esc => app.clear_filter(),
        KeyCode::Backspace => app.pop_filter_char(),
        KeyCode::Down => app.next(),
        KeyCode::Up => app.prev(),
        KeyCode::Enter => {
            app.exit_filter_mode();
            if let Some(cmd) = app.play_selection() {
                send(audio_player, cmd);
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_filter_char(c),
        _ => {}
    }
    Flow::Continue
}

fn handle_key(
    app: &mut App,
    audio_player: &AudioPlayer,
    settings: &config::Settings,
    key: KeyEvent,
) -> Flow {
    let seek = settings.controls.seek_seconds as i64;
    let step = settings.controls.volume_step;

    match key.code {
        KeyCode::Char('q') => return Flow::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.next(),
        KeyCode::Char('k') | KeyCode::Up => app.prev(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Char('/') => app.enter_filter_mode(),
        KeyCode::Esc | KeyCode::Backspace => {
            if !app.back() {
                app.clear_filter();
            }
        }
        KeyCode::Tab => app.cycle_view(),
        KeyCode::Enter => {
            if app.view.lists_collections() {
                app.open_selection();
            } else if let Some(cmd) = app.play_selection() {
                send(audio_player, cmd);
            }
        }
        KeyCode::Char('P') => {
            if let Some(cmd) = app.play_entry() {
                send(audio_player, cmd);
            }
        }
        KeyCode::Char('n') => app.start_new_playlist(),
        KeyCode::Char('e') => {
            app.start_rename_playlist();
        }
        KeyCode::Char('x') => {
            let result = app.delete_selection();
            report(app, result);
        }
        KeyCode::Char('A') => {
            let result = app.add_selection_to_playlist();
            report(app, result);
        }
        KeyCode::Char('J') => {
            let result = app.move_selection(1).map(|()| None);
            report(app, result);
        }
        KeyCode::Char('K') => {
            let result = app.move_selection(-1).map(|()| None);
            report(app, result);
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => send(audio_player, AudioCmd::TogglePlay),
        KeyCode::Char('l') => send(audio_player, AudioCmd::SkipNext),
        KeyCode::Char('h') => send(audio_player, AudioCmd::SkipPrevious),
        KeyCode::Char('L') => send(audio_player, AudioCmd::SeekBy(seek)),
        KeyCode::Char('H') => send(audio_player, AudioCmd::SeekBy(-seek)),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            send(audio_player, AudioCmd::SetVolume(app.player.volume + step))
        }
        KeyCode::Char('-') => send(audio_player, AudioCmd::SetVolume(app.player.volume - step)),
        KeyCode::Char('s') => send(audio_player, AudioCmd::ToggleShuffle),
        KeyCode::Char('r') => send(audio_player, AudioCmd::ToggleRepeat),
        KeyCode::Char('a') => {
            if let Some(cmd) = app.queue_selection() {
                send(audio_player, cmd);
            }
        }
        KeyCode::Char('d') => {
            if let Some(cmd) = app.remove_selection() {
                send(audio_player, cmd);
            }
        }
        KeyCode::Char('c') => send(audio_player, AudioCmd::ClearQueue),
        KeyCode::Char('f') => match app.toggle_like_selected() {
            Ok(Some(t)) => {
                let msg = if t.is_liked {
                    "Added to liked songs"
                } else {
                    "Removed from liked songs"
                };
                app.set_notice(Notice::success(msg), Instant::now());
            }
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "toggle like failed");
                app.set_notice(Notice::error(e.to_string()), Instant::now());
            }
        },
        _ => {}
    }
    Flow::Continue
}
