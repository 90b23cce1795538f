use serde::{Deserialize, Serialize};

/// Identifies a species/kind of simulated body.
///
/// Kinds are plain ids rather than an enum so that host code can define its
/// own kinds and register material profiles and threshold rules for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityKind(pub u16);

impl EntityKind {
    /// The player-controlled body; the default privileged heat source.
    pub const PLAYER: EntityKind = EntityKind(0);
    /// Generic inert object.
    pub const DEBRIS: EntityKind = EntityKind(1);
    pub const ROCK: EntityKind = EntityKind(2);
    /// Thrown weapon; very conductive, glows when hot.
    pub const SPEAR: EntityKind = EntityKind(3);
    pub const LANTERN: EntityKind = EntityKind(4);
    /// Data pearl; its contents corrupt past a threshold.
    pub const PEARL: EntityKind = EntityKind(5);
    /// Explosive plant; ignites its fuse past a threshold.
    pub const FIRECRACKER: EntityKind = EntityKind(6);
    /// Spore pod; bursts when overheated.
    pub const SPORE_POD: EntityKind = EntityKind(7);
    /// Hive; releases its swarm when overheated.
    pub const BEE_NEST: EntityKind = EntityKind(8);
    /// Composite multi-seed plant; burns segment by segment.
    pub const SEED_POD: EntityKind = EntityKind(9);
    pub const FRUIT: EntityKind = EntityKind(10);
    /// Edible larva; signals distress when warm.
    pub const GRUB: EntityKind = EntityKind(11);
    pub const FLY: EntityKind = EntityKind(12);
    pub const SPIDER: EntityKind = EntityKind(13);
    /// Mid-size predator; flees from heat.
    pub const HUNTER: EntityKind = EntityKind(14);
    /// Large web-spinner.
    pub const WEAVER: EntityKind = EntityKind(15);
    /// Flying creature; tolerates more heat before fleeing.
    pub const SKIMMER: EntityKind = EntityKind(16);
    /// Generic creature fallback.
    pub const CREATURE: EntityKind = EntityKind(17);

    /// First id available for host-defined kinds.
    pub const FIRST_CUSTOM: u16 = 1000;
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Kind({})", self.0)
    }
}
