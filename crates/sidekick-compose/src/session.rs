//! Live characters, at most one per output name.

use std::collections::BTreeMap;

use crate::composer::Character;

#[derive(Debug, Default)]
pub struct Session {
    live: BTreeMap<String, Character>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `character` live, destroying any live character with the same
    /// name first. Returns the destroyed one.
    pub fn spawn(&mut self, character: Character) -> Option<Character> {
        let replaced = self.destroy(&character.name);
        tracing::debug!(name = %character.name, parts = character.parts.len(), "Spawned character");
        self.live.insert(character.name.clone(), character);
        replaced
    }

    pub fn destroy(&mut self, name: &str) -> Option<Character> {
        let removed = self.live.remove(name);
        if removed.is_some() {
            tracing::debug!(%name, "Destroyed character");
        }
        removed
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.live.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.live.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn clear(&mut self) {
        self.live.clear();
    }
}
