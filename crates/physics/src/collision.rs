//! Collision groups separating the two kinds of ray targets.

use rapier3d::prelude::{Group, InteractionGroups};

/// What a hit collider represents.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetGroup {
    /// Selectable celestial bodies (click-to-inspect).
    Body = 1 << 0,
    /// The UFO hull (weapon fire).
    Ufo = 1 << 1,
}

impl TargetGroup {
    fn bits(self) -> Group {
        Group::from_bits_retain(self as u32)
    }

    /// Groups assigned to a collider of this kind: member of its own group, visible to every query.
    pub fn collider_groups(self) -> InteractionGroups {
        InteractionGroups::new(self.bits(), Group::ALL)
    }

    /// Groups for a query that should only see colliders of this kind.
    pub fn query_groups(self) -> InteractionGroups {
        InteractionGroups::new(Group::ALL, self.bits())
    }
}
