use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{Learnset, Move, Pokemon};

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

// ── JSON ──

/// Write records as one compact JSON array, replacing the file.
fn write_json<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn write_moves(path: &Path, moves: &[Move]) -> Result<()> {
    write_json(path, moves)
}

pub fn read_moves(path: &Path) -> Result<Vec<Move>> {
    read_json(path)
}

pub fn write_pokemon(path: &Path, pokemon: &[Pokemon]) -> Result<()> {
    write_json(path, pokemon)
}

pub fn read_pokemon(path: &Path) -> Result<Vec<Pokemon>> {
    read_json(path)
}

// ── Learnsets CSV ──

/// One headerless row per species: pokemon id, then ascending move ids.
pub fn write_learnsets(path: &Path, learnsets: &[Learnset]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for learnset in learnsets {
        let mut record = Vec::with_capacity(learnset.move_ids.len() + 1);
        record.push(learnset.pokemon_id.to_string());
        record.extend(learnset.move_ids.iter().map(|id| id.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read learnset rows in file order. Blank lines are skipped; every other field must be a number.
///
/// Repeated pokemon ids are kept as separate rows so the verifier can report them.
pub fn read_learnsets(path: &Path) -> Result<Vec<Learnset>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;

    let mut learnsets = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let parse = |field: &str, what: &str| -> Result<u32> {
            let field = field.trim();
            field.parse::<u32>().with_context(|| {
                format!("{} line {}: bad {} {:?}", path.display(), line + 1, what, field)
            })
        };
        let pokemon_id = parse(&record[0], "pokemon id")?;
        let move_ids = record
            .iter()
            .skip(1)
            .map(|f| parse(f, "move id"))
            .collect::<Result<BTreeSet<u32>>>()?;
        learnsets.push(Learnset {
            pokemon_id,
            move_ids,
        });
    }
    Ok(learnsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Stats;

    fn sample_moves() -> Vec<Move> {
        vec![
            Move {
                id: 1,
                name: "Flamethrower".into(),
                identifier: "flamethrower".into(),
                type_id: 10,
                power: 90,
                accuracy: 100,
                pp: 15,
                priority: 0,
                damage_class_id: 3,
            },
            Move {
                id: 2,
                name: "Splash".into(),
                identifier: "splash".into(),
                type_id: 1,
                power: 0,
                accuracy: 0,
                pp: 40,
                priority: 0,
                damage_class_id: 1,
            },
        ]
    }

    fn sample_pokemon() -> Vec<Pokemon> {
        vec![Pokemon {
            id: 122,
            name: "Mr. Mime".into(),
            identifier: "mr-mime".into(),
            types: vec![14, 18],
            stats: Stats {
                hp: 40,
                attack: 45,
                defense: 65,
                sp_attack: 100,
                sp_defense: 120,
                speed: 90,
            },
        }]
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let moves_path = dir.path().join("moves.json");
        let pokemon_path = dir.path().join("nested/pokemon.json");

        write_moves(&moves_path, &sample_moves()).unwrap();
        write_pokemon(&pokemon_path, &sample_pokemon()).unwrap();

        assert_eq!(read_moves(&moves_path).unwrap(), sample_moves());
        assert_eq!(read_pokemon(&pokemon_path).unwrap(), sample_pokemon());

        let raw = fs::read_to_string(&moves_path).unwrap();
        assert!(!raw.contains('\n'), "compact encoding");
    }

    #[test]
    fn pokemon_json_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pokemon.json");
        write_pokemon(&path, &sample_pokemon()).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(
            raw,
            r#"[{"id":122,"name":"Mr. Mime","identifier":"mr-mime","types":[14,18],"stats":{"hp":40,"attack":45,"defense":65,"sp_attack":100,"sp_defense":120,"speed":90}}]"#
        );
    }

    #[test]
    fn learnsets_round_trip_variable_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnsets.csv");
        let learnsets = vec![
            Learnset {
                pokemon_id: 6,
                move_ids: BTreeSet::from([30, 4, 12]),
            },
            Learnset {
                pokemon_id: 129,
                move_ids: BTreeSet::from([8]),
            },
            Learnset {
                pokemon_id: 10,
                move_ids: BTreeSet::new(),
            },
        ];
        write_learnsets(&path, &learnsets).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "6,4,12,30\n129,8\n10\n");

        assert_eq!(read_learnsets(&path).unwrap(), learnsets);
    }

    #[test]
    fn learnsets_skip_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnsets.csv");
        fs::write(&path, "1,2,3\n\n25,5\n").unwrap();
        let back = read_learnsets(&path).unwrap();
        let ids: Vec<u32> = back.iter().map(|l| l.pokemon_id).collect();
        assert_eq!(ids, vec![1, 25]);
    }

    #[test]
    fn learnsets_reject_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnsets.csv");
        fs::write(&path, "1,two\n").unwrap();
        assert!(read_learnsets(&path).is_err());

        fs::write(&path, ",5,7\n").unwrap();
        let err = read_learnsets(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad pokemon id"));

        fs::write(&path, "1,,2\n").unwrap();
        let err = read_learnsets(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("bad move id"));
    }

    #[test]
    fn learnsets_keep_repeated_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("learnsets.csv");
        fs::write(&path, "6,1\n6,2\n").unwrap();
        let back = read_learnsets(&path).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back[1].move_ids, BTreeSet::from([2]));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_moves(&dir.path().join("nope.json")).is_err());
    }
}
