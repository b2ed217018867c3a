use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// Number of species in the generation-1 pokédex.
pub const MAX_SPECIES: u32 = 151;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageClass {
    Unknown,
    Status,
    Physical,
    Special,
}

impl DamageClass {
    /// Map the listing's category tag (`data-sort-value` of the Cat. cell).
    pub fn from_category(tag: &str) -> Self {
        match tag.trim() {
            "status" => DamageClass::Status,
            "physical" => DamageClass::Physical,
            "special" => DamageClass::Special,
            _ => DamageClass::Unknown,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            DamageClass::Unknown => 0,
            DamageClass::Status => 1,
            DamageClass::Physical => 2,
            DamageClass::Special => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub id: u32,
    pub name: String,
    pub identifier: String,
    pub type_id: u8,
    pub power: u32,
    pub accuracy: u32,
    pub pp: u32,
    pub priority: i32,
    pub damage_class_id: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub sp_attack: u32,
    pub sp_defense: u32,
    pub speed: u32,
}

impl Stats {
    pub fn values(&self) -> [u32; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.sp_attack,
            self.sp_defense,
            self.speed,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: u32,
    pub name: String,
    pub identifier: String,
    pub types: Vec<u8>,
    pub stats: Stats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Learnset {
    pub pokemon_id: u32,
    pub move_ids: BTreeSet<u32>,
}

/// Move identifier → move id, built once from the scraped move listing.
#[derive(Debug, Clone, Default)]
pub struct MoveIndex {
    ids: HashMap<String, u32>,
}

impl MoveIndex {
    pub fn from_moves(moves: &[Move]) -> Self {
        let ids = moves
            .iter()
            .map(|m| (m.identifier.clone(), m.id))
            .collect();
        MoveIndex { ids }
    }

    pub fn get(&self, identifier: &str) -> Option<u32> {
        self.ids.get(identifier).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
