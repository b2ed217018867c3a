use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::Result;

use crate::config::{LEARNSETS_FILE, MOVES_FILE, POKEMON_FILE};
use crate::model::{Move, Pokemon, MAX_SPECIES};
use crate::store;
use crate::types::PokemonType;

const CHARIZARD: u32 = 6;
const PIKACHU: u32 = 25;
const MAGIKARP: u32 = 129;
const DITTO: u32 = 132;
const MEW: u32 = 151;

/// The three emitted datasets, keyed for lookups.
pub struct Dataset {
    pub pokemon: BTreeMap<u32, Pokemon>,
    pub moves: BTreeMap<u32, Move>,
    pub move_ids: HashMap<String, u32>,
    pub learnsets: BTreeMap<u32, BTreeSet<u32>>,
    /// Record counts as loaded, before keying (duplicates would collapse in the maps).
    pub pokemon_rows: usize,
    pub move_rows: usize,
    duplicate_move_ids: Vec<u32>,
    duplicate_identifiers: Vec<String>,
    duplicate_pokemon_ids: Vec<u32>,
    duplicate_learnset_ids: Vec<u32>,
}

impl Dataset {
    pub fn new(
        pokemon: Vec<Pokemon>,
        moves: Vec<Move>,
        learnset_rows: impl IntoIterator<Item = (u32, BTreeSet<u32>)>,
    ) -> Self {
        let pokemon_rows = pokemon.len();
        let move_rows = moves.len();

        let mut duplicate_pokemon_ids = Vec::new();
        let mut by_id = BTreeMap::new();
        for p in pokemon {
            let id = p.id;
            if by_id.insert(id, p).is_some() {
                duplicate_pokemon_ids.push(id);
            }
        }

        let mut duplicate_move_ids = Vec::new();
        let mut duplicate_identifiers = Vec::new();
        let mut move_ids = HashMap::new();
        let mut moves_by_id = BTreeMap::new();
        for m in moves {
            if move_ids.insert(m.identifier.clone(), m.id).is_some() {
                duplicate_identifiers.push(m.identifier.clone());
            }
            let id = m.id;
            if moves_by_id.insert(id, m).is_some() {
                duplicate_move_ids.push(id);
            }
        }

        // Later rows win, matching a plain keyed load.
        let mut duplicate_learnset_ids = Vec::new();
        let mut learnsets = BTreeMap::new();
        for (pokemon_id, move_ids) in learnset_rows {
            if learnsets.insert(pokemon_id, move_ids).is_some() {
                duplicate_learnset_ids.push(pokemon_id);
            }
        }

        Dataset {
            pokemon: by_id,
            moves: moves_by_id,
            move_ids,
            learnsets,
            pokemon_rows,
            move_rows,
            duplicate_move_ids,
            duplicate_identifiers,
            duplicate_pokemon_ids,
            duplicate_learnset_ids,
        }
    }

    /// Load `pokemon.json`, `moves.json` and `learnsets.csv` from a directory.
    pub fn load(dir: &Path) -> Result<Self> {
        let pokemon = store::read_pokemon(&dir.join(POKEMON_FILE))?;
        let moves = store::read_moves(&dir.join(MOVES_FILE))?;
        let learnsets = store::read_learnsets(&dir.join(LEARNSETS_FILE))?;
        Ok(Dataset::new(
            pokemon,
            moves,
            learnsets.into_iter().map(|l| (l.pokemon_id, l.move_ids)),
        ))
    }

    fn learns(&self, pokemon_id: u32, move_id: u32) -> bool {
        self.learnsets
            .get(&pokemon_id)
            .is_some_and(|set| set.contains(&move_id))
    }
}

pub struct Report {
    pub errors: Vec<String>,
    pub pokemon_checked: usize,
    pub moves_checked: usize,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn print(&self) {
        if self.passed() {
            println!("Verification PASSED!");
            println!(
                "Checked {} Pokemon and {} Moves.",
                self.pokemon_checked, self.moves_checked
            );
        } else {
            println!("Verification FAILED with errors:");
            for e in &self.errors {
                println!("- {}", e);
            }
        }
    }
}

/// Run every check and collect all failures.
pub fn verify(data: &Dataset) -> Report {
    let mut errors = Vec::new();

    check_cardinality(data, &mut errors);
    check_pokemon_shape(data, &mut errors);
    check_move_uniqueness(data, &mut errors);
    check_references(data, &mut errors);
    check_known_facts(data, &mut errors);

    Report {
        errors,
        pokemon_checked: data.pokemon_rows,
        moves_checked: data.move_rows,
    }
}

// ── Cardinality ──

fn check_cardinality(data: &Dataset, errors: &mut Vec<String>) {
    let expected = MAX_SPECIES as usize;
    if data.pokemon_rows != expected {
        errors.push(format!("Expected {} Pokemon, found {}", expected, data.pokemon_rows));
    }
    if data.learnsets.len() != expected {
        errors.push(format!(
            "Expected {} learnsets, found {}",
            expected,
            data.learnsets.len()
        ));
    }

    let missing: Vec<String> = (1..=MAX_SPECIES)
        .filter(|id| !data.pokemon.contains_key(id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        errors.push(format!("Missing Pokemon ids: {}", missing.join(", ")));
    }
    let out_of_range: Vec<String> = data
        .pokemon
        .keys()
        .filter(|id| !(1..=MAX_SPECIES).contains(*id))
        .map(|id| id.to_string())
        .collect();
    if !out_of_range.is_empty() {
        errors.push(format!(
            "Pokemon ids outside 1..={}: {}",
            MAX_SPECIES,
            out_of_range.join(", ")
        ));
    }
    for id in &data.duplicate_pokemon_ids {
        errors.push(format!("Pokemon id {} appears more than once", id));
    }
    for id in &data.duplicate_learnset_ids {
        errors.push(format!("Learnset for Pokemon {} appears more than once", id));
    }
}

fn check_pokemon_shape(data: &Dataset, errors: &mut Vec<String>) {
    for p in data.pokemon.values() {
        let distinct: HashSet<u8> = p.types.iter().copied().collect();
        if p.types.is_empty() || p.types.len() > 2 || distinct.len() != p.types.len() {
            errors.push(format!(
                "{} ({}) must have 1 or 2 distinct types, has {:?}",
                p.name, p.id, p.types
            ));
        }
    }
}

fn check_move_uniqueness(data: &Dataset, errors: &mut Vec<String>) {
    for id in &data.duplicate_move_ids {
        errors.push(format!("Move id {} appears more than once", id));
    }
    for ident in &data.duplicate_identifiers {
        errors.push(format!("Move identifier {:?} appears more than once", ident));
    }
}

// ── Referential integrity ──

fn check_references(data: &Dataset, errors: &mut Vec<String>) {
    for (pokemon_id, moves) in &data.learnsets {
        if !data.pokemon.contains_key(pokemon_id) {
            errors.push(format!("Learnset for unknown Pokemon {}", pokemon_id));
        }
        let dangling: Vec<String> = moves
            .iter()
            .filter(|m| !data.moves.contains_key(m))
            .map(|m| m.to_string())
            .collect();
        if !dangling.is_empty() {
            errors.push(format!(
                "Learnset for Pokemon {} references unknown moves: {}",
                pokemon_id,
                dangling.join(", ")
            ));
        }
    }
}

// ── Known facts ──

fn check_known_facts(data: &Dataset, errors: &mut Vec<String>) {
    let mut lookup = |identifier: &str, display: &str| -> Option<u32> {
        let id = data.move_ids.get(identifier).copied();
        if id.is_none() {
            errors.push(format!("{} not found in moves db", display));
        }
        id
    };
    let flamethrower = lookup("flamethrower", "Flamethrower");
    let thunderbolt = lookup("thunderbolt", "Thunderbolt");
    let splash = lookup("splash", "Splash");
    let transform = lookup("transform", "Transform");
    let hyper_beam = data.move_ids.get("hyper-beam").copied();

    let mut expect_learns = |pokemon: &str, pokemon_id: u32, move_name: &str, move_id: Option<u32>| {
        if let Some(move_id) = move_id {
            if !data.learns(pokemon_id, move_id) {
                errors.push(format!(
                    "{} ({}) does not learn {} ({})",
                    pokemon, pokemon_id, move_name, move_id
                ));
            }
        }
    };
    expect_learns("Charizard", CHARIZARD, "Flamethrower", flamethrower);
    expect_learns("Pikachu", PIKACHU, "Thunderbolt", thunderbolt);
    expect_learns("Magikarp", MAGIKARP, "Splash", splash);
    expect_learns("Mew", MEW, "Transform", transform);
    expect_learns("Ditto", DITTO, "Transform", transform);

    if let Some(hyper_beam) = hyper_beam {
        if data.learns(MAGIKARP, hyper_beam) {
            errors.push(format!(
                "Magikarp ({}) SHOULD NOT learn Hyper Beam ({})",
                MAGIKARP, hyper_beam
            ));
        }
    }

    if let Some(charizard) = data.pokemon.get(&CHARIZARD) {
        let (fire, flying) = (PokemonType::Fire, PokemonType::Flying);
        if !charizard.types.contains(&fire.id()) || !charizard.types.contains(&flying.id()) {
            errors.push(format!(
                "Charizard types incorrect: {:?}. Expected {}({}) and {}({})",
                charizard.types,
                fire,
                fire.id(),
                flying,
                flying.id()
            ));
        }
    }

    if let Some(mew) = data.pokemon.get(&MEW) {
        if !mew.stats.values().iter().all(|&v| v == 100) {
            errors.push(format!("Mew stats incorrect: {:?}", mew.stats));
        }
    }
}
