//! Declarative per-kind temperature thresholds
//!
//! Species react to heat outside this core: a firecracker ignites, a pearl's
//! data corrupts, prey flees. The table records those trigger points as
//! data. External collaborators poll it against an entity's temperature each
//! tick and run the actual reaction; the core itself only consults it to
//! decide whether an entity is still worth heating.

use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;

/// What crossing a threshold asks the host to do. One-shot transitions;
/// the host is responsible for not repeating them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThresholdReaction {
    /// Light a fuse or burst into flame (destroys the body).
    Ignite,
    /// Kill the creature; the corpse remains.
    Die,
    /// Detonate (destroys the body).
    Explode,
    /// Irreversibly corrupt carried data; the body remains.
    Corrupt,
    /// Release a held swarm.
    ReleaseSwarm,
    /// Behavioral flight from the heat.
    Flee,
    /// Emit a distress signal.
    Signal,
}

impl ThresholdReaction {
    /// Reactions that leave nothing behind to keep heating.
    fn destroys(self) -> bool {
        matches!(self, ThresholdReaction::Ignite | ThresholdReaction::Explode)
    }
}

/// One trigger point for one kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub kind: EntityKind,
    /// Fires while temperature exceeds this.
    pub min_temperature: f32,
    pub reaction: ThresholdReaction,
}

/// The per-species threshold table, seeded with the built-in tuning and
/// open to host extension.
pub struct ReactionTable {
    rules: Vec<ThresholdRule>,
}

impl ReactionTable {
    pub fn new() -> Self {
        let mut table = ReactionTable { rules: Vec::new() };
        table.register_defaults();
        table
    }

    fn register_defaults(&mut self) {
        use ThresholdReaction::*;

        self.register(EntityKind::FLY, 0.1, Die);
        self.register(EntityKind::FLY, 0.5, Ignite);
        self.register(EntityKind::SPIDER, 0.1, Die);
        self.register(EntityKind::SPIDER, 0.2, Ignite);
        self.register(EntityKind::GRUB, 0.05, Signal);
        self.register(EntityKind::GRUB, 0.25, Die);

        self.register(EntityKind::FIRECRACKER, 0.25, Ignite);
        self.register(EntityKind::SPORE_POD, 0.49, Explode);
        self.register(EntityKind::BEE_NEST, 0.7, ReleaseSwarm);
        self.register(EntityKind::PEARL, 0.7, Corrupt);

        self.register(EntityKind::HUNTER, 0.08, Flee);
        self.register(EntityKind::WEAVER, 0.1, Flee);
        self.register(EntityKind::SKIMMER, 0.25, Flee);
    }

    pub fn register(&mut self, kind: EntityKind, min_temperature: f32, reaction: ThresholdReaction) {
        self.rules.push(ThresholdRule {
            kind,
            min_temperature,
            reaction,
        });
    }

    /// Rules of `kind` crossed at `temperature`, for the host to act on.
    pub fn crossed(
        &self,
        kind: EntityKind,
        temperature: f32,
    ) -> impl Iterator<Item = &ThresholdRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.kind == kind && temperature > rule.min_temperature)
    }

    /// Whether an entity of `kind` at `temperature` is still a sensible
    /// heating target: once a destructive threshold is crossed the host is
    /// about to remove it.
    pub fn heating_eligible(&self, kind: EntityKind, temperature: f32) -> bool {
        !self
            .crossed(kind, temperature)
            .any(|rule| rule.reaction.destroys())
    }
}

impl Default for ReactionTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossed_rules() {
        let table = ReactionTable::new();

        let cold: Vec<_> = table.crossed(EntityKind::FLY, 0.05).collect();
        assert!(cold.is_empty());

        let warm: Vec<_> = table.crossed(EntityKind::FLY, 0.3).collect();
        assert_eq!(warm.len(), 1);
        assert_eq!(warm[0].reaction, ThresholdReaction::Die);

        let hot: Vec<_> = table.crossed(EntityKind::FLY, 0.6).collect();
        assert_eq!(hot.len(), 2);
    }

    #[test]
    fn test_heating_eligibility() {
        let table = ReactionTable::new();

        // A warm spore pod is still heatable; past the burst point it isn't.
        assert!(table.heating_eligible(EntityKind::SPORE_POD, 0.4));
        assert!(!table.heating_eligible(EntityKind::SPORE_POD, 0.5));

        // Corruption leaves the pearl physically intact.
        assert!(table.heating_eligible(EntityKind::PEARL, 0.9));

        // Death leaves a corpse worth roasting.
        assert!(table.heating_eligible(EntityKind::GRUB, 0.3));
    }

    #[test]
    fn test_host_extension() {
        let mut table = ReactionTable::new();
        let custom = EntityKind(EntityKind::FIRST_CUSTOM);

        table.register(custom, 0.33, ThresholdReaction::Explode);
        assert!(table.heating_eligible(custom, 0.2));
        assert!(!table.heating_eligible(custom, 0.4));
    }
}
