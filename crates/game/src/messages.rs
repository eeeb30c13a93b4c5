//! Short-lived toast messages shown over the flight view.

#[derive(Debug, Clone, PartialEq)]
pub struct GameMessage {
    pub text: String,
    pub color: [f32; 4],
    pub time_remaining: f32,
}

/// The on-screen message log.
#[derive(Debug, Clone)]
pub struct GameMessages {
    pub messages: Vec<GameMessage>,
    pub max_visible: usize,
    default_duration: f32,
}

impl Default for GameMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl GameMessages {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            max_visible: 4,
            default_duration: 3.0,
        }
    }

    pub fn push(&mut self, text: impl Into<String>, color: [f32; 4]) {
        self.messages.push(GameMessage {
            text: text.into(),
            color,
            time_remaining: self.default_duration,
        });
        if self.messages.len() > 16 {
            self.messages.remove(0);
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(text, [1.0, 1.0, 1.0, 1.0]);
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(text, [0.3, 1.0, 0.3, 1.0]);
    }

    pub fn warning(&mut self, text: impl Into<String>) {
        self.push(text, [1.0, 0.35, 0.3, 1.0]);
    }

    pub fn update(&mut self, dt: f32) {
        for msg in &mut self.messages {
            msg.time_remaining -= dt;
        }
        self.messages.retain(|m| m.time_remaining > 0.0);
    }

    /// Newest messages, at most `max_visible`.
    pub fn visible(&self) -> &[GameMessage] {
        let start = self.messages.len().saturating_sub(self.max_visible);
        &self.messages[start..]
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_expire() {
        let mut log = GameMessages::new();
        log.info("Discovered Mars");
        log.update(1.0);
        assert_eq!(log.visible().len(), 1);
        log.update(2.5);
        assert!(log.visible().is_empty());
    }

    #[test]
    fn only_newest_are_visible() {
        let mut log = GameMessages::new();
        for i in 0..6 {
            log.info(format!("message {}", i));
        }
        let visible = log.visible();
        assert_eq!(visible.len(), 4);
        assert_eq!(visible[3].text, "message 5");
    }
}
