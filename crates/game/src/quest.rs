//! Discovery tracking for the "visit every body" quest.

use std::collections::BTreeSet;

/// Names that make up the quest, in checklist order.
pub const QUEST_BODIES: [&str; 10] = [
    "Sun", "Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune", "Moon",
];

/// Bodies the player has inspected this session. Insert-only.
#[derive(Debug, Clone)]
pub struct QuestTracker {
    targets: BTreeSet<String>,
    discovered: BTreeSet<String>,
}

impl Default for QuestTracker {
    fn default() -> Self {
        Self::new(QUEST_BODIES)
    }
}

impl QuestTracker {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            discovered: BTreeSet::new(),
        }
    }

    /// Record a discovery. Returns true if the name was new. Names outside
    /// the quest are ignored.
    pub fn register_discovery(&mut self, name: &str) -> bool {
        if !self.targets.contains(name) {
            log::debug!("Ignoring discovery of non-quest body {}", name);
            return false;
        }
        let added = self.discovered.insert(name.to_string());
        if added {
            log::info!(
                "Discovered {} ({}/{})",
                name,
                self.discovered.len(),
                self.targets.len()
            );
        }
        added
    }

    /// Every target discovered. Exact set equality, not a count.
    pub fn is_complete(&self) -> bool {
        self.discovered == self.targets
    }

    pub fn is_discovered(&self, name: &str) -> bool {
        self.discovered.contains(name)
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// `(name, discovered)` in checklist order.
    pub fn checklist(&self) -> Vec<(String, bool)> {
        let mut order: Vec<&String> = self.targets.iter().collect();
        order.sort_by_key(|name| {
            QUEST_BODIES
                .iter()
                .position(|q| *q == name.as_str())
                .unwrap_or(usize::MAX)
        });
        order
            .into_iter()
            .map(|name| (name.clone(), self.is_discovered(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_is_idempotent() {
        let mut quest = QuestTracker::default();
        let visits = ["Mars", "Earth", "Mars", "Moon", "Earth", "Mars"];
        for name in visits {
            quest.register_discovery(name);
        }
        assert_eq!(quest.discovered_count(), 3);
        assert!(!quest.register_discovery("Moon"));
    }

    #[test]
    fn nine_of_ten_is_not_complete() {
        let mut quest = QuestTracker::default();
        for name in QUEST_BODIES.iter().skip(1) {
            quest.register_discovery(name);
        }
        assert_eq!(quest.discovered_count(), 9);
        assert!(!quest.is_complete());
        quest.register_discovery("Sun");
        assert!(quest.is_complete());
    }

    #[test]
    fn order_does_not_matter() {
        let mut quest = QuestTracker::default();
        for name in QUEST_BODIES.iter().rev() {
            quest.register_discovery(name);
        }
        assert!(quest.is_complete());
    }

    #[test]
    fn unknown_names_never_count() {
        let mut quest = QuestTracker::default();
        assert!(!quest.register_discovery("Pluto"));
        assert_eq!(quest.discovered_count(), 0);
    }

    #[test]
    fn checklist_keeps_quest_order() {
        let mut quest = QuestTracker::default();
        quest.register_discovery("Moon");
        let list = quest.checklist();
        assert_eq!(list.len(), 10);
        assert_eq!(list[0], ("Sun".to_string(), false));
        assert_eq!(list[9], ("Moon".to_string(), true));
    }
}
