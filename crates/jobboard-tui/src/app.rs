use ratatui::layout::Rect;
use jobboard_core::{ChatSimulator, Config, JobListing, Message, SystemClock};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Listing,
    Chat,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub focus: FocusPane,

    // Data
    pub job: JobListing,
    pub chat: ChatSimulator<SystemClock>,

    // Draft cursor, in characters
    pub draft_cursor: usize,

    // Listing pane scroll state
    pub listing_scroll: u16,
    pub listing_height: u16,
    pub total_listing_lines: u16,

    // Chat pane scroll state (inner size, updated during render)
    pub chat_scroll: u16,
    pub chat_height: u16,
    pub chat_width: u16,
    seen_revision: u64,

    // Panel areas for mouse hit-testing (updated during render)
    pub listing_area: Option<Rect>,
    pub chat_area: Option<Rect>,
}

impl App {
    pub fn new(job: JobListing, config: &Config) -> Self {
        let chat = ChatSimulator::from_config(SystemClock::new(), config);

        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            focus: FocusPane::Listing,

            job,
            chat,

            draft_cursor: 0,

            listing_scroll: 0,
            listing_height: 0,
            total_listing_lines: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            seen_revision: 0,

            listing_area: None,
            chat_area: None,
        }
    }

    /// Deliver due replies (called by Tick event)
    pub fn tick(&mut self) {
        if self.chat.next_due().is_none() {
            return;
        }
        if self.chat.tick() > 0 {
            self.follow_latest();
        }
    }

    pub fn submit_draft(&mut self) {
        self.chat.submit_draft();
        if self.chat.draft().is_empty() {
            self.draft_cursor = 0;
        }
        self.follow_latest();
    }

    pub fn close_chat(&mut self) {
        self.chat.close_chat_panel();
        self.focus = FocusPane::Listing;
        self.input_mode = InputMode::Normal;
    }

    pub fn start_editing(&mut self) {
        if self.chat.chat_visible() {
            self.focus = FocusPane::Chat;
            self.input_mode = InputMode::Editing;
            self.draft_cursor = self.chat.draft().chars().count();
        }
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Listing if self.chat.chat_visible() => FocusPane::Chat,
            _ => FocusPane::Listing,
        };
    }

    /// Scroll the chat to the newest message if the transcript grew since
    /// the last call
    pub fn follow_latest(&mut self) {
        let revision = self.chat.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.scroll_chat_to_bottom();
        }
    }

    /// Scroll chat so the last message is visible
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 40 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            40
        };

        let total_lines = transcript_line_count(self.chat.transcript(), wrap_width);

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Scrolling
    pub fn scroll_down(&mut self) {
        match self.focus {
            FocusPane::Listing => {
                let max = self.total_listing_lines.saturating_sub(self.listing_height);
                self.listing_scroll = (self.listing_scroll + 1).min(max);
            }
            FocusPane::Chat => self.chat_scroll = self.chat_scroll.saturating_add(1),
        }
    }

    pub fn scroll_up(&mut self) {
        match self.focus {
            FocusPane::Listing => self.listing_scroll = self.listing_scroll.saturating_sub(1),
            FocusPane::Chat => self.chat_scroll = self.chat_scroll.saturating_sub(1),
        }
    }

    pub fn scroll_top(&mut self) {
        match self.focus {
            FocusPane::Listing => self.listing_scroll = 0,
            FocusPane::Chat => self.chat_scroll = 0,
        }
    }

    pub fn scroll_bottom(&mut self) {
        match self.focus {
            FocusPane::Listing => {
                self.listing_scroll = self.total_listing_lines.saturating_sub(self.listing_height);
            }
            FocusPane::Chat => self.scroll_chat_to_bottom(),
        }
    }
}

/// Rendered height of the transcript at `wrap_width`, measured on the same
/// word-wrapped paragraph the chat pane draws
pub fn transcript_line_count(messages: &[Message], wrap_width: usize) -> u16 {
    let width = u16::try_from(wrap_width.max(1)).unwrap_or(u16::MAX);
    let lines = ui::chat_history(messages).line_count(width);
    u16::try_from(lines).unwrap_or(u16::MAX)
}
