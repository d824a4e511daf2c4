use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use crate::app::{App, FocusPane, InputMode};
use crate::tui::AppEvent;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => app.scroll_chat_to_bottom(),
        AppEvent::Tick => app.tick(),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        KeyCode::Tab => app.cycle_focus(),

        KeyCode::Char('j') | KeyCode::Down => app.scroll_down(),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_up(),
        KeyCode::Char('g') => app.scroll_top(),
        KeyCode::Char('G') => app.scroll_bottom(),

        // "Show all" / "Hide" on the locations list
        KeyCode::Char('l') => app.chat.toggle_locations_expanded(),

        KeyCode::Char('x') => app.close_chat(),

        KeyCode::Char('i') | KeyCode::Enter => app.start_editing(),

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // Stay in editing mode so the next message can be typed right away
            app.submit_draft();
        }
        KeyCode::Backspace => {
            if app.draft_cursor > 0 {
                app.draft_cursor -= 1;
                let draft = app.chat.draft_mut();
                let byte_pos = char_to_byte_index(draft, app.draft_cursor);
                draft.remove(byte_pos);
            }
        }
        KeyCode::Delete => {
            let cursor = app.draft_cursor;
            let draft = app.chat.draft_mut();
            if cursor < draft.chars().count() {
                let byte_pos = char_to_byte_index(draft, cursor);
                draft.remove(byte_pos);
            }
        }
        KeyCode::Left => {
            app.draft_cursor = app.draft_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            let char_count = app.chat.draft().chars().count();
            app.draft_cursor = (app.draft_cursor + 1).min(char_count);
        }
        KeyCode::Home => {
            app.draft_cursor = 0;
        }
        KeyCode::End => {
            app.draft_cursor = app.chat.draft().chars().count();
        }
        KeyCode::Char(c) => {
            let cursor = app.draft_cursor;
            let draft = app.chat.draft_mut();
            let byte_pos = char_to_byte_index(draft, cursor);
            draft.insert(byte_pos, c);
            app.draft_cursor += 1;
        }
        _ => {}
    }
}

fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let over_chat = app
        .chat_area
        .is_some_and(|area| point_in_rect(mouse.column, mouse.row, area));
    let over_listing = app
        .listing_area
        .is_some_and(|area| point_in_rect(mouse.column, mouse.row, area));

    match mouse.kind {
        MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
            let previous = app.focus;
            if over_chat {
                app.focus = FocusPane::Chat;
            } else if over_listing {
                app.focus = FocusPane::Listing;
            } else {
                return;
            }

            if mouse.kind == MouseEventKind::ScrollDown {
                app.scroll_down();
            } else {
                app.scroll_up();
            }
            app.focus = previous;
        }
        MouseEventKind::Down(_) => {
            if over_chat {
                app.focus = FocusPane::Chat;
            } else if over_listing {
                app.focus = FocusPane::Listing;
                app.input_mode = InputMode::Normal;
            }
        }
        _ => {}
    }
}
