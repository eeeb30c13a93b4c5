//! Typewriter dialog: reveals a body's description one character at a time.
//!
//! `Idle -> Revealing -> Complete -> Idle`. Closing is only accepted once the
//! whole text is shown.

use engine_core::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Idle,
    Revealing,
    Complete,
}

/// Reported to the owner so it can gate the typewriter sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogEvent {
    RevealStarted,
    RevealCompleted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DialogSession {
    pub subject: String,
    pub full_text: String,
    /// Characters shown so far.
    pub revealed: usize,
    total: usize,
}

impl DialogSession {
    pub fn revealed_text(&self) -> &str {
        match self.full_text.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.full_text[..end],
            None => &self.full_text,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.revealed >= self.total
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RevealTick;

#[derive(Debug, Clone)]
pub struct DialogController {
    session: Option<DialogSession>,
    timers: Scheduler<RevealTick>,
    char_period: f32,
}

impl DialogController {
    pub fn new(chars_per_second: f32) -> Self {
        Self {
            session: None,
            timers: Scheduler::new(),
            char_period: 1.0 / chars_per_second.max(1.0),
        }
    }

    pub fn state(&self) -> DialogState {
        match &self.session {
            None => DialogState::Idle,
            Some(s) if s.is_complete() => DialogState::Complete,
            Some(_) => DialogState::Revealing,
        }
    }

    pub fn session(&self) -> Option<&DialogSession> {
        self.session.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Show `text` for `subject`, restarting from the first character even
    /// if another reveal is in progress.
    pub fn open(&mut self, subject: &str, text: &str) -> Vec<DialogEvent> {
        let total = text.chars().count();
        self.session = Some(DialogSession {
            subject: subject.to_string(),
            full_text: text.to_string(),
            revealed: 0,
            total,
        });
        let mut events = vec![DialogEvent::RevealStarted];
        if total == 0 {
            self.timers.cancel(RevealTick);
            events.push(DialogEvent::RevealCompleted);
        } else {
            self.timers.schedule_repeating(RevealTick, self.char_period);
        }
        events
    }

    /// Reveal the characters due in `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Option<DialogEvent> {
        let ticks = self.timers.advance(dt).len();
        if ticks == 0 {
            return None;
        }
        let session = self.session.as_mut()?;
        if session.is_complete() {
            return None;
        }
        session.revealed = (session.revealed + ticks).min(session.total);
        if session.is_complete() {
            self.timers.cancel(RevealTick);
            log::debug!("Dialog for {} fully revealed", session.subject);
            return Some(DialogEvent::RevealCompleted);
        }
        None
    }

    /// Dismiss the dialog. Rejected unless the text is complete.
    pub fn close(&mut self) -> Option<DialogSession> {
        if self.state() != DialogState::Complete {
            return None;
        }
        self.timers.clear();
        self.session.take()
    }

    /// Drop the dialog regardless of state.
    pub fn reset(&mut self) {
        self.timers.clear();
        self.session = None;
    }
}
