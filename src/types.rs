use std::fmt;

/// Elemental types, numbered the way PokeAPI numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokemonType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

pub const ALL_TYPES: [PokemonType; 18] = [
    PokemonType::Normal,
    PokemonType::Fighting,
    PokemonType::Flying,
    PokemonType::Poison,
    PokemonType::Ground,
    PokemonType::Rock,
    PokemonType::Bug,
    PokemonType::Ghost,
    PokemonType::Steel,
    PokemonType::Fire,
    PokemonType::Water,
    PokemonType::Grass,
    PokemonType::Electric,
    PokemonType::Psychic,
    PokemonType::Ice,
    PokemonType::Dragon,
    PokemonType::Dark,
    PokemonType::Fairy,
];

/// Id written for a type name the table doesn't know.
pub const UNKNOWN_TYPE_ID: u8 = 0;

impl PokemonType {
    pub fn id(self) -> u8 {
        use PokemonType::*;
        match self {
            Normal => 1,
            Fighting => 2,
            Flying => 3,
            Poison => 4,
            Ground => 5,
            Rock => 6,
            Bug => 7,
            Ghost => 8,
            Steel => 9,
            Fire => 10,
            Water => 11,
            Grass => 12,
            Electric => 13,
            Psychic => 14,
            Ice => 15,
            Dragon => 16,
            Dark => 17,
            Fairy => 18,
        }
    }

    pub fn name(self) -> &'static str {
        use PokemonType::*;
        match self {
            Normal => "normal",
            Fighting => "fighting",
            Flying => "flying",
            Poison => "poison",
            Ground => "ground",
            Rock => "rock",
            Bug => "bug",
            Ghost => "ghost",
            Steel => "steel",
            Fire => "fire",
            Water => "water",
            Grass => "grass",
            Electric => "electric",
            Psychic => "psychic",
            Ice => "ice",
            Dragon => "dragon",
            Dark => "dark",
            Fairy => "fairy",
        }
    }

    /// Case-insensitive lookup of a type name as printed on the site ("Fire", "PSYCHIC").
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        ALL_TYPES.into_iter().find(|t| t.name() == wanted)
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Resolve a type name to its numeric id, 0 when unknown.
pub fn type_id(name: &str) -> u8 {
    PokemonType::from_name(name)
        .map(PokemonType::id)
        .unwrap_or(UNKNOWN_TYPE_ID)
}
