//! User-facing names for enemies and traps.
//!
//! Names are what scripts use to reach entities, so they must be valid
//! identifiers and unique across the dungeon.

use super::Dungeon;
use crate::error::DungeonError;
use crate::types::EntityId;

/// `^[_A-Za-z][_A-Za-z0-9]*$`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

fn squeeze(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

impl Dungeon {
    /// Picks a free name. Without `requested` this is the lowercased `base`
    /// numbered from 1; a taken requested name gets numbered from 2.
    pub(crate) fn claim_name(
        &self,
        base: &str,
        requested: Option<&str>,
    ) -> Result<String, DungeonError> {
        let (stem, mut name) = match requested {
            Some(requested) => {
                let requested = squeeze(requested);
                if !is_identifier(&requested) {
                    return Err(DungeonError::InvalidName { name: requested });
                }
                (requested.clone(), requested)
            }
            None => {
                let stem = squeeze(&base.to_lowercase());
                let first = format!("{stem}1");
                (stem, first)
            }
        };
        let mut n = 2;
        while self.names.contains_key(&name) {
            name = format!("{stem}{n}");
            n += 1;
        }
        Ok(name)
    }

    /// Id of the live enemy or trap called `name`.
    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    pub fn name_of(&self, id: EntityId) -> Option<&str> {
        self.names
            .iter()
            .find(|(_, v)| **v == id)
            .map(|(k, _)| k.as_str())
    }

    /// `(name, id)` pairs in name order.
    pub fn named_entities(&self) -> impl Iterator<Item = (&str, EntityId)> {
        self.names.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Renames an entity. The new name must be a free identifier.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), DungeonError> {
        if !is_identifier(new) {
            return Err(DungeonError::InvalidName {
                name: new.to_owned(),
            });
        }
        if self.names.contains_key(new) {
            return Err(DungeonError::NameTaken {
                name: new.to_owned(),
            });
        }
        let id = self.names.remove(old).ok_or_else(|| DungeonError::UnknownName {
            name: old.to_owned(),
        })?;
        self.names.insert(new.to_owned(), id);
        if let Some(actor) = self.actor_mut(id) {
            actor.name = new.to_owned();
        } else if let Some(trap) = self.trap_mut(id) {
            trap.name = new.to_owned();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::roster::EnemyRoster;
    use crate::types::Position;

    #[test]
    fn identifiers() {
        assert!(is_identifier("_a1"));
        assert!(is_identifier("Boss"));
        assert!(!is_identifier("1abc"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn generated_names_count_up() {
        let mut d = Dungeon::new(GameConfig::default());
        let roster = EnemyRoster::standard();
        let demon = roster.get("FireDemon").unwrap();
        let a = d.place_enemy(Position::new(1, 1), demon, None).unwrap();
        let b = d.place_enemy(Position::new(2, 1), demon, None).unwrap();
        assert_eq!(d.name_of(a), Some("firedemon1"));
        assert_eq!(d.name_of(b), Some("firedemon2"));

        let c = d.place_enemy(Position::new(3, 1), demon, Some("boss")).unwrap();
        let e = d.place_enemy(Position::new(4, 1), demon, Some("boss")).unwrap();
        assert_eq!(d.name_of(c), Some("boss"));
        assert_eq!(d.name_of(e), Some("boss2"));
    }

    #[test]
    fn rename_validates() {
        let mut d = Dungeon::new(GameConfig::default());
        let roster = EnemyRoster::standard();
        let snake = roster.get("snake").unwrap();
        let id = d.place_enemy(Position::new(1, 1), snake, None).unwrap();
        d.place_enemy(Position::new(2, 1), snake, None).unwrap();

        assert!(matches!(d.rename("snake1", "9lives"), Err(DungeonError::InvalidName { .. })));
        assert!(matches!(d.rename("snake1", "snake2"), Err(DungeonError::NameTaken { .. })));
        assert!(matches!(d.rename("ghost", "spirit"), Err(DungeonError::UnknownName { .. })));

        d.rename("snake1", "hiss").unwrap();
        assert_eq!(d.lookup("hiss"), Some(id));
        assert_eq!(d.actor(id).map(|a| a.name()), Some("hiss"));
        assert_eq!(d.lookup("snake1"), None);
    }
}
