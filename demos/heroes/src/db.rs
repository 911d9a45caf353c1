//! In-memory hero store.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A hero record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    /// Store-assigned identifier.
    pub id: u64,
    /// Display name.
    pub hero_name: String,
    /// One defining trait.
    pub character_trait: String,
}

/// Request body for creating a hero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHero {
    /// Display name.
    pub hero_name: String,
    /// One defining trait.
    pub character_trait: String,
}

/// Raised when a lookup misses.
#[derive(Debug, Error)]
#[error("No hero with this ID found.")]
pub struct HeroNotFound;

struct State {
    id_counter: u64,
    heroes: Vec<Hero>,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }
}

/// Very simple in-memory "database".
pub struct HeroDatabase {
    state: Mutex<State>,
}

impl HeroDatabase {
    /// Creates a store seeded with the guardians.
    #[must_use]
    pub fn new() -> Self {
        let mut state = State {
            id_counter: 0,
            heroes: Vec::new(),
        };
        for (hero_name, character_trait) in [
            ("Star-Lord", "Always wears his Walkman"),
            ("Gamora", "Has green skin"),
            ("Drax", "Does not understand metaphors"),
            ("Rocket", "Loves big guns"),
            ("Groot", "I am Groot!"),
        ] {
            let id = state.next_id();
            state.heroes.push(Hero {
                id,
                hero_name: hero_name.to_string(),
                character_trait: character_trait.to_string(),
            });
        }

        Self {
            state: Mutex::new(state),
        }
    }

    /// Returns all heroes in insertion order.
    #[must_use]
    pub fn heroes(&self) -> Vec<Hero> {
        self.state.lock().heroes.clone()
    }

    /// Looks up a hero by id.
    ///
    /// # Errors
    ///
    /// Fails with [`HeroNotFound`] when no hero carries the id.
    pub fn hero(&self, id: u64) -> Result<Hero, HeroNotFound> {
        self.state
            .lock()
            .heroes
            .iter()
            .find(|hero| hero.id == id)
            .cloned()
            .ok_or(HeroNotFound)
    }

    /// Adds a hero and returns it with its assigned id.
    pub fn add(&self, new: NewHero) -> Hero {
        let mut state = self.state.lock();
        let id = state.next_id();
        let hero = Hero {
            id,
            hero_name: new.hero_name,
            character_trait: new.character_trait,
        };
        state.heroes.push(hero.clone());
        hero
    }
}

impl Default for HeroDatabase {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_five_heroes() {
        let db = HeroDatabase::new();
        let heroes = db.heroes();
        assert_eq!(heroes.len(), 5);
        assert_eq!(heroes[0].hero_name, "Star-Lord");
        assert_eq!(heroes[4].hero_name, "Groot");
    }

    #[test]
    fn lookup_by_id() {
        let db = HeroDatabase::new();
        assert_eq!(db.hero(3).unwrap().hero_name, "Drax");
        assert!(db.hero(42).is_err());
    }

    #[test]
    fn added_heroes_get_fresh_ids() {
        let db = HeroDatabase::new();
        let hero = db.add(NewHero {
            hero_name: String::from("Mantis"),
            character_trait: String::from("Empath"),
        });
        assert_eq!(hero.id, 6);
        assert_eq!(db.heroes().len(), 6);
    }
}
