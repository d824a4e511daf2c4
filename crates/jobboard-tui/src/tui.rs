use std::io::{self, Stderr};
use std::time::Duration;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind, MouseEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    Tick,
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    _tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let _tx = tx.clone();

        // Spawn event reader task
        let tx_events = tx.clone();
        tokio::spawn(forward_terminal_events(event::EventStream::new(), tx_events));

        // Tick drives pending assistant replies
        let tx_tick = tx.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval);
            loop {
                interval.tick().await;
                if tx_tick.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, _tx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Forward terminal events until the stream ends, the stream fails or the
/// receiver goes away. A read error means the terminal is gone, so it is
/// logged once and ends the reader.
async fn forward_terminal_events<S>(mut events: S, tx: mpsc::UnboundedSender<AppEvent>)
where
    S: Stream<Item = io::Result<Event>> + Unpin,
{
    while let Some(evt) = events.next().await {
        let evt = match evt {
            Ok(evt) => evt,
            Err(e) => {
                tracing::warn!("terminal event stream failed, stopping input: {e}");
                break;
            }
        };

        let app_event = match evt {
            // Only handle key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
            Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
            Event::Resize(_, _) => Some(AppEvent::Resize),
            _ => None,
        };

        if let Some(event) = app_event {
            if tx.send(event).is_err() {
                break;
            }
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen)?;

    // Enable mouse capture
    execute!(io::stderr(), crossterm::event::EnableMouseCapture)?;

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), crossterm::event::DisableMouseCapture)?;
    execute!(io::stderr(), LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Install panic hook to restore terminal on panic
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures_util::stream;

    fn key_event(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_reader_stops_at_first_error() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = stream::iter(vec![
            Ok(key_event('a')),
            Err(io::Error::other("tty closed")),
            Ok(key_event('b')),
        ]);

        forward_terminal_events(events, tx).await;

        assert!(matches!(rx.recv().await, Some(AppEvent::Key(k)) if k.code == KeyCode::Char('a')));
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_reader_maps_resize_and_skips_focus() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let events = stream::iter(vec![
            Ok::<_, io::Error>(Event::FocusGained),
            Ok(Event::Resize(80, 24)),
        ]);

        forward_terminal_events(events, tx).await;

        assert!(matches!(rx.recv().await, Some(AppEvent::Resize)));
        assert!(rx.recv().await.is_none());
    }
}
