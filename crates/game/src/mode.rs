//! The single top-level interaction mode.

/// Where a dialog returns to when dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume {
    Flying,
    ExploreOnly,
}

impl Resume {
    pub fn mode(self) -> InteractionMode {
        match self {
            Resume::Flying => InteractionMode::Flying,
            Resume::ExploreOnly => InteractionMode::ExploreOnly,
        }
    }
}

/// Exactly one is active; it decides which inputs are live and which
/// overlay is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionMode {
    Flying,
    ReadingDialog { resume: Resume },
    QuestCelebration,
    Warning,
    Combat,
    Victory,
    ExploreOnly,
}

/// The one banner or popup a mode shows, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    Dialog,
    QuestPopup,
    WarningPopup,
    VictoryPopup,
}

impl InteractionMode {
    pub fn name(self) -> &'static str {
        match self {
            InteractionMode::Flying => "Flying",
            InteractionMode::ReadingDialog { .. } => "ReadingDialog",
            InteractionMode::QuestCelebration => "QuestCelebration",
            InteractionMode::Warning => "Warning",
            InteractionMode::Combat => "Combat",
            InteractionMode::Victory => "Victory",
            InteractionMode::ExploreOnly => "ExploreOnly",
        }
    }

    pub fn overlay(self) -> Option<Overlay> {
        match self {
            InteractionMode::ReadingDialog { .. } => Some(Overlay::Dialog),
            InteractionMode::QuestCelebration => Some(Overlay::QuestPopup),
            InteractionMode::Warning | InteractionMode::Combat => Some(Overlay::WarningPopup),
            InteractionMode::Victory => Some(Overlay::VictoryPopup),
            InteractionMode::Flying | InteractionMode::ExploreOnly => None,
        }
    }

    /// Overlays that take the pointer away from flight.
    pub fn is_modal(self) -> bool {
        matches!(
            self.overlay(),
            Some(Overlay::Dialog) | Some(Overlay::VictoryPopup)
        )
    }

    /// Clicking a body opens its dialog.
    pub fn allows_selection(self) -> bool {
        matches!(self, InteractionMode::Flying | InteractionMode::ExploreOnly)
    }

    /// The UFO is on screen and the weapon key is live.
    pub fn is_encounter(self) -> bool {
        matches!(self, InteractionMode::Warning | InteractionMode::Combat)
    }

    /// Post-victory exploration, including dialogs opened from it.
    pub fn is_explore_only(self) -> bool {
        matches!(
            self,
            InteractionMode::ExploreOnly
                | InteractionMode::ReadingDialog {
                    resume: Resume::ExploreOnly
                }
        )
    }
}
