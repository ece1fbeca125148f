//! Transient effects keyed by `(owner, tag)`.
//!
//! Each owner holds at most one effect per tag: setting an occupied key
//! replaces the previous entry.

use std::collections::BTreeMap;

use crate::projectile::Projectile;
use crate::types::EntityId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum EffectTag {
    Sleep,
    Ranged,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Particle {
    /// Indicator shown over a sleeping actor.
    SleepMarker,
    Projectile(Projectile),
}

impl Particle {
    pub fn is_expired(&self) -> bool {
        match self {
            Particle::SleepMarker => false,
            Particle::Projectile(projectile) => projectile.is_expired(),
        }
    }

    pub fn as_projectile(&self) -> Option<&Projectile> {
        match self {
            Particle::Projectile(projectile) => Some(projectile),
            Particle::SleepMarker => None,
        }
    }
}

pub type EffectKey = (EntityId, EffectTag);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectRegistry {
    entries: BTreeMap<EffectKey, Particle>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `particle` under `(owner, tag)`, returning whatever it replaced.
    pub fn set(&mut self, owner: EntityId, tag: EffectTag, particle: Particle) -> Option<Particle> {
        self.entries.insert((owner, tag), particle)
    }

    pub fn get(&self, owner: EntityId, tag: EffectTag) -> Option<&Particle> {
        self.entries.get(&(owner, tag))
    }

    pub fn contains(&self, owner: EntityId, tag: EffectTag) -> bool {
        self.entries.contains_key(&(owner, tag))
    }

    pub fn remove(&mut self, owner: EntityId, tag: EffectTag) -> Option<Particle> {
        self.entries.remove(&(owner, tag))
    }

    /// Drops every effect owned by `owner`.
    pub fn remove_owner(&mut self, owner: EntityId) {
        self.entries.retain(|(id, _), _| *id != owner);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = EffectKey> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EffectKey, &Particle)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&EffectKey, &mut Particle)> {
        self.entries.iter_mut()
    }

    pub(crate) fn get_mut(&mut self, key: EffectKey) -> Option<&mut Particle> {
        self.entries.get_mut(&key)
    }

    pub(crate) fn sweep(&mut self) {
        self.entries.retain(|_, particle| !particle.is_expired());
    }

    pub fn has_projectiles(&self) -> bool {
        self.entries
            .values()
            .any(|particle| matches!(particle, Particle::Projectile(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_overwrites() {
        let mut effects = EffectRegistry::new();
        let owner = EntityId(4);
        assert!(effects.set(owner, EffectTag::Sleep, Particle::SleepMarker).is_none());
        assert!(effects.set(owner, EffectTag::Sleep, Particle::SleepMarker).is_some());
        assert_eq!(effects.len(), 1);

        effects.set(EntityId(5), EffectTag::Sleep, Particle::SleepMarker);
        assert_eq!(effects.len(), 2);
    }

    #[test]
    fn remove_owner_keeps_others() {
        let mut effects = EffectRegistry::new();
        effects.set(EntityId(1), EffectTag::Sleep, Particle::SleepMarker);
        effects.set(EntityId(2), EffectTag::Sleep, Particle::SleepMarker);
        effects.remove_owner(EntityId(1));
        assert!(!effects.contains(EntityId(1), EffectTag::Sleep));
        assert!(effects.contains(EntityId(2), EffectTag::Sleep));
    }
}
