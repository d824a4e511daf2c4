//! Simulated assistant chat.
//!
//! The "assistant" never reads what the user wrote: every accepted submit
//! schedules the same canned reply, which lands after a fixed delay. Timers
//! are entries in a pending queue that [`ChatSimulator::tick`] drains against
//! the simulator's [`Clock`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::state::Message;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);
pub const DEFAULT_REPLY_TEXT: &str = "Thanks for providing that! I’m looking into your order now.";

/// How message ids are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdPolicy {
    /// User ids are `transcript length + 1`, which equals the last assigned
    /// id + 1 only while no ids have collided. A reply's id is fixed when its
    /// timer starts, as `transcript length + 1` right after the user message
    /// lands. Overlapping submits can produce duplicate ids.
    #[default]
    Snapshot,
    /// One counter shared by user and bot messages. Reply ids are taken when
    /// the reply fires, so ids strictly increase in transcript order.
    Counter,
}

#[derive(Debug, Clone)]
struct PendingReply {
    due_at: Duration,
    seq: u64,
    id: Option<u64>,
}

/// Read-only view of the chat state, for the view layer and `--dump-state`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatSnapshot {
    pub transcript: Vec<Message>,
    pub draft: String,
    pub locations_expanded: bool,
    pub chat_visible: bool,
    pub pending_replies: usize,
}

pub struct ChatSimulator<C: Clock = SystemClock> {
    clock: C,
    transcript: Vec<Message>,
    draft: String,
    locations_expanded: bool,
    chat_visible: bool,
    pending: Vec<PendingReply>,
    next_seq: u64,
    last_id: u64,
    revision: u64,

    id_policy: IdPolicy,
    reply_delay: Duration,
    reply_text: String,
}

fn seed_transcript() -> Vec<Message> {
    vec![
        Message::bot(1, "Hello! How can I help you today?"),
        Message::user(2, "I need help with my order"),
        Message::bot(3, "Sure! Please provide me with your order number"),
    ]
}

impl<C: Clock> ChatSimulator<C> {
    pub fn new(clock: C) -> Self {
        let transcript = seed_transcript();
        let last_id = transcript.iter().map(|m| m.id).max().unwrap_or(0);

        Self {
            clock,
            transcript,
            draft: String::new(),
            locations_expanded: false,
            chat_visible: true,
            pending: Vec::new(),
            next_seq: 0,
            last_id,
            revision: 0,

            id_policy: IdPolicy::default(),
            reply_delay: DEFAULT_REPLY_DELAY,
            reply_text: DEFAULT_REPLY_TEXT.to_string(),
        }
    }

    /// Build a simulator using the reply settings from `config`
    pub fn from_config(clock: C, config: &Config) -> Self {
        Self::new(clock)
            .with_reply_delay(config.reply_delay())
            .with_reply_text(config.reply_text())
            .with_id_policy(config.id_policy)
    }

    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    pub fn with_reply_text(mut self, text: impl Into<String>) -> Self {
        self.reply_text = text.into();
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    // Accessors
    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn locations_expanded(&self) -> bool {
        self.locations_expanded
    }

    pub fn chat_visible(&self) -> bool {
        self.chat_visible
    }

    pub fn pending_replies(&self) -> usize {
        self.pending.len()
    }

    pub fn reply_delay(&self) -> Duration {
        self.reply_delay
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Bumped on every transcript append; views scroll to the latest message
    /// when it changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Earliest time at which a pending reply becomes due
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|p| p.due_at)
    }

    pub fn snapshot(&self) -> ChatSnapshot {
        ChatSnapshot {
            transcript: self.transcript.clone(),
            draft: self.draft.clone(),
            locations_expanded: self.locations_expanded,
            chat_visible: self.chat_visible,
            pending_replies: self.pending.len(),
        }
    }

    // Draft editing
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    /// Submit the current draft
    pub fn submit_draft(&mut self) {
        let text = self.draft.clone();
        self.submit(&text);
    }

    /// Append `text` as a user message and schedule the canned reply.
    ///
    /// Whitespace-only text is ignored without touching the draft. Accepted
    /// text is stored untrimmed.
    pub fn submit(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }

        let user_id = match self.id_policy {
            IdPolicy::Snapshot => self.transcript.len() as u64 + 1,
            IdPolicy::Counter => self.last_id + 1,
        };
        self.append(Message::user(user_id, text));
        self.draft.clear();

        let reply_id = match self.id_policy {
            IdPolicy::Snapshot => Some(self.transcript.len() as u64 + 1),
            IdPolicy::Counter => None,
        };
        let due_at = self.clock.now() + self.reply_delay;
        let seq = self.next_seq;
        self.next_seq += 1;

        // Keep the queue ordered by (due_at, seq) so ties fire in start order
        let pos = self
            .pending
            .partition_point(|p| (p.due_at, p.seq) <= (due_at, seq));
        self.pending.insert(pos, PendingReply { due_at, seq, id: reply_id });

        tracing::debug!(
            id = user_id,
            pending = self.pending.len(),
            due_ms = due_at.as_millis() as u64,
            "user message accepted, reply scheduled"
        );
    }

    /// Fire every reply whose timer has expired. Returns how many were
    /// appended.
    ///
    /// Replies still fire after the panel is closed.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let due = self.pending.partition_point(|p| p.due_at <= now);
        if due == 0 {
            return 0;
        }

        let fired: Vec<PendingReply> = self.pending.drain(..due).collect();
        for reply in &fired {
            let id = reply.id.unwrap_or(self.last_id + 1);
            let text = self.reply_text.clone();
            self.append(Message::bot(id, text));
            tracing::debug!(id, seq = reply.seq, "assistant reply delivered");
        }

        fired.len()
    }

    pub fn toggle_locations_expanded(&mut self) {
        self.locations_expanded = !self.locations_expanded;
    }

    /// Hide the chat panel for the rest of the session
    pub fn close_chat_panel(&mut self) {
        if self.chat_visible {
            tracing::info!(pending = self.pending.len(), "chat panel closed");
        }
        self.chat_visible = false;
    }

    fn append(&mut self, message: Message) {
        tracing::trace!(id = message.id, sender = message.sender.as_str(), "message appended");
        self.last_id = self.last_id.max(message.id);
        self.transcript.push(message);
        self.revision += 1;
    }

    /// Latest message, which the view keeps in sight
    pub fn latest(&self) -> Option<&Message> {
        self.transcript.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::state::Sender;

    fn simulator() -> (ChatSimulator<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (ChatSimulator::new(clock.clone()), clock)
    }

    fn ids(chat: &ChatSimulator<ManualClock>) -> Vec<u64> {
        chat.transcript().iter().map(|m| m.id).collect()
    }

    #[test]
    fn test_seeded_conversation() {
        let (chat, _) = simulator();
        let t = chat.transcript();
        assert_eq!(t.len(), 3);
        assert_eq!(t[0], Message::bot(1, "Hello! How can I help you today?"));
        assert_eq!(t[1], Message::user(2, "I need help with my order"));
        assert_eq!(t[2].sender, Sender::Bot);
        assert!(chat.chat_visible());
        assert!(!chat.locations_expanded());
        assert_eq!(chat.draft(), "");
    }

    #[test]
    fn test_empty_submit_is_ignored() {
        let (mut chat, clock) = simulator();
        chat.submit("");
        chat.submit("   \t\n");
        clock.advance(DEFAULT_REPLY_DELAY * 2);
        assert_eq!(chat.tick(), 0);
        assert_eq!(chat.transcript().len(), 3);
        assert_eq!(chat.pending_replies(), 0);
        assert_eq!(chat.revision(), 0);
    }

    #[test]
    fn test_whitespace_draft_is_left_untouched() {
        let (mut chat, _) = simulator();
        chat.set_draft("   ");
        chat.submit_draft();
        assert_eq!(chat.draft(), "   ");
        assert_eq!(chat.transcript().len(), 3);
    }

    #[test]
    fn test_submit_appends_user_message_and_clears_draft() {
        let (mut chat, _) = simulator();
        chat.set_draft("X");
        chat.submit_draft();

        assert_eq!(chat.transcript().len(), 4);
        assert_eq!(chat.latest(), Some(&Message::user(4, "X")));
        assert_eq!(chat.draft(), "");
        assert_eq!(chat.pending_replies(), 1);
    }

    #[test]
    fn test_submit_keeps_untrimmed_text() {
        let (mut chat, _) = simulator();
        chat.submit("  padded  ");
        assert_eq!(chat.latest().unwrap().text, "  padded  ");
    }

    #[test]
    fn test_reply_waits_for_delay() {
        let (mut chat, clock) = simulator();
        chat.submit("X");

        clock.advance(Duration::from_millis(999));
        assert_eq!(chat.tick(), 0);
        assert_eq!(chat.transcript().len(), 4);

        clock.advance(Duration::from_millis(1));
        assert_eq!(chat.tick(), 1);
        assert_eq!(chat.transcript().len(), 5);
        assert_eq!(chat.latest(), Some(&Message::bot(5, DEFAULT_REPLY_TEXT)));

        // Fires exactly once
        clock.advance(DEFAULT_REPLY_DELAY);
        assert_eq!(chat.tick(), 0);
        assert_eq!(chat.transcript().len(), 5);
    }

    #[test]
    fn test_order_number_scenario() {
        let (mut chat, clock) = simulator();
        chat.submit("order #123");
        assert_eq!(chat.transcript().len(), 4);
        let last = chat.latest().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "order #123");

        clock.advance(DEFAULT_REPLY_DELAY);
        chat.tick();
        assert_eq!(chat.transcript().len(), 5);
        let last = chat.latest().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, DEFAULT_REPLY_TEXT);
    }

    #[test]
    fn test_overlapping_submits_reuse_snapshot_ids() {
        let (mut chat, clock) = simulator();
        chat.submit("first");
        clock.advance(Duration::from_millis(100));
        chat.submit("second");

        let users: Vec<&str> = chat.transcript()[3..].iter().map(|m| m.text.as_str()).collect();
        assert_eq!(users, vec!["first", "second"]);
        assert_eq!(chat.pending_replies(), 2);

        clock.advance(DEFAULT_REPLY_DELAY);
        assert_eq!(chat.tick(), 2);

        let t = chat.transcript();
        assert_eq!(t.len(), 7);
        assert_eq!(t[5].sender, Sender::Bot);
        assert_eq!(t[6].sender, Sender::Bot);

        // The first reply's id was fixed before "second" landed, so it
        // collides with the second user message.
        assert_eq!(ids(&chat), vec![1, 2, 3, 4, 5, 5, 6]);
        assert!(ids(&chat).windows(2).any(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_snapshot_user_id_after_collision() {
        let (mut chat, clock) = simulator();
        chat.submit("a");
        chat.submit("b");
        clock.advance(DEFAULT_REPLY_DELAY);
        chat.tick();
        chat.submit("c");

        // Length-based: 7 messages precede "c", though the largest id so far is 6
        assert_eq!(ids(&chat), vec![1, 2, 3, 4, 5, 5, 6, 8]);
        assert_eq!(chat.latest(), Some(&Message::user(8, "c")));
    }

    #[test]
    fn test_replies_fire_in_start_order() {
        let (mut chat, clock) = simulator();
        chat.submit("a");
        clock.advance(Duration::from_millis(300));
        chat.submit("b");

        clock.advance(Duration::from_millis(700));
        assert_eq!(chat.tick(), 1);
        assert_eq!(chat.transcript().len(), 6);
        assert_eq!(chat.latest().unwrap().id, 5);

        clock.advance(Duration::from_millis(300));
        assert_eq!(chat.tick(), 1);
        assert_eq!(chat.latest().unwrap().id, 6);
    }

    #[test]
    fn test_counter_policy_ids_strictly_increase() {
        let clock = ManualClock::new();
        let mut chat = ChatSimulator::new(clock.clone()).with_id_policy(IdPolicy::Counter);
        chat.submit("first");
        chat.submit("second");
        clock.advance(DEFAULT_REPLY_DELAY);
        chat.tick();

        assert_eq!(ids(&chat), vec![1, 2, 3, 4, 5, 6, 7]);
        let bots = chat.transcript().iter().filter(|m| m.sender == Sender::Bot).count();
        assert_eq!(bots, 4);
    }

    #[test]
    fn test_toggle_locations_twice_restores() {
        let (mut chat, _) = simulator();
        let before = chat.locations_expanded();
        chat.toggle_locations_expanded();
        assert_ne!(chat.locations_expanded(), before);
        chat.toggle_locations_expanded();
        assert_eq!(chat.locations_expanded(), before);
    }

    #[test]
    fn test_close_is_permanent_and_replies_still_land() {
        let (mut chat, clock) = simulator();
        chat.submit("X");
        chat.close_chat_panel();
        assert!(!chat.chat_visible());

        chat.toggle_locations_expanded();
        chat.close_chat_panel();
        assert!(!chat.chat_visible());

        clock.advance(DEFAULT_REPLY_DELAY);
        assert_eq!(chat.tick(), 1);
        assert_eq!(chat.transcript().len(), 5);
        assert!(!chat.chat_visible());
    }

    #[test]
    fn test_revision_tracks_appends() {
        let (mut chat, clock) = simulator();
        chat.submit("X");
        assert_eq!(chat.revision(), 1);
        assert_eq!(chat.next_due(), Some(DEFAULT_REPLY_DELAY));
        clock.advance(DEFAULT_REPLY_DELAY);
        chat.tick();
        assert_eq!(chat.revision(), 2);
        assert_eq!(chat.next_due(), None);
    }

    #[test]
    fn test_custom_reply_settings() {
        let clock = ManualClock::new();
        let mut chat = ChatSimulator::new(clock.clone())
            .with_reply_delay(Duration::from_millis(50))
            .with_reply_text("On it.");
        chat.submit("X");
        clock.advance(Duration::from_millis(50));
        chat.tick();
        assert_eq!(chat.latest().unwrap().text, "On it.");
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let (mut chat, _) = simulator();
        chat.set_draft("typing");
        chat.toggle_locations_expanded();
        let snap = chat.snapshot();
        assert_eq!(snap.transcript.len(), 3);
        assert_eq!(snap.draft, "typing");
        assert!(snap.locations_expanded);
        assert!(snap.chat_visible);
        assert_eq!(snap.pending_replies, 0);
    }

    #[test]
    fn test_from_config() {
        let config = Config {
            reply_delay_ms: 20,
            reply_text: Some("Got it.".to_string()),
            id_policy: IdPolicy::Counter,
            ..Config::new()
        };
        let clock = ManualClock::new();
        let mut chat = ChatSimulator::from_config(clock.clone(), &config);
        assert_eq!(chat.reply_delay(), Duration::from_millis(20));
        assert_eq!(chat.id_policy(), IdPolicy::Counter);

        chat.submit("X");
        clock.advance(Duration::from_millis(20));
        chat.tick();
        assert_eq!(chat.latest(), Some(&Message::bot(5, "Got it.")));
    }
}
