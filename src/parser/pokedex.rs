use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{anyhow, bail, Context, Result};
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

use crate::html::{anchor_text, body_rows, cells, text_of, ANCHOR};
use crate::identifier::normalize;
use crate::model::{Pokemon, Stats, MAX_SPECIES};
use crate::types::type_id;

static POKEDEX_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#pokedex").unwrap());
static ID_SPAN: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.infocard-cell-data").unwrap());
static SUBNAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("small").unwrap());

// Column layout: #, Name, Type, Total, HP, Attack, Defense, Sp. Atk, Sp. Def, Speed
const COL_ID: usize = 0;
const COL_NAME: usize = 1;
const COL_TYPES: usize = 2;
const COL_FIRST_STAT: usize = 4;

/// Parse the national pokédex listing into the primary-form row of species 1..=151.
///
/// Rows outside the range are filtered by id, so the listing doesn't need to be sorted.
/// Alternate forms carry a `<small>` sub-name in the name cell and are skipped.
pub fn extract(html: &str) -> Result<Vec<Pokemon>> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&POKEDEX_TABLE)
        .next()
        .ok_or_else(|| anyhow!("pokedex listing has no #pokedex table"))?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (i, row) in body_rows(table).into_iter().enumerate() {
        let cols = cells(row);
        let id = parse_id(&cols).with_context(|| format!("pokedex row {}", i + 1))?;
        if !(1..=MAX_SPECIES).contains(&id) {
            continue;
        }
        if is_alternate_form(&cols) {
            continue;
        }
        if !seen.insert(id) {
            warn!("Duplicate primary row for #{} in pokedex listing, keeping the first", id);
            continue;
        }
        let pokemon = parse_row(id, &cols).with_context(|| format!("pokedex row {} (#{})", i + 1, id))?;
        out.push(pokemon);
    }

    Ok(out)
}

fn parse_id(cols: &[ElementRef<'_>]) -> Result<u32> {
    let cell = cols
        .get(COL_ID)
        .ok_or_else(|| anyhow!("row has no cells"))?;
    let raw = cell
        .select(&ID_SPAN)
        .next()
        .map(text_of)
        .ok_or_else(|| anyhow!("id cell has no infocard-cell-data span"))?;
    raw.parse::<u32>()
        .with_context(|| format!("invalid pokedex number {:?}", raw))
}

fn is_alternate_form(cols: &[ElementRef<'_>]) -> bool {
    cols.get(COL_NAME)
        .map(|c| c.select(&SUBNAME).next().is_some())
        .unwrap_or(false)
}

fn parse_row(id: u32, cols: &[ElementRef<'_>]) -> Result<Pokemon> {
    let name_cell = cols
        .get(COL_NAME)
        .ok_or_else(|| anyhow!("missing name column"))?;
    let name = anchor_text(*name_cell).ok_or_else(|| anyhow!("name cell has no link"))?;

    let types: Vec<u8> = cols
        .get(COL_TYPES)
        .ok_or_else(|| anyhow!("missing type column"))?
        .select(&ANCHOR)
        .map(|a| type_id(&text_of(a)))
        .collect();
    if types.is_empty() || types.len() > 2 {
        bail!("{} has {} types", name, types.len());
    }

    let stat = |offset: usize, label: &str| -> Result<u32> {
        let cell = cols
            .get(COL_FIRST_STAT + offset)
            .ok_or_else(|| anyhow!("missing {} column", label))?;
        let text = text_of(*cell);
        text.parse::<u32>()
            .with_context(|| format!("{} of {} is not a number: {:?}", label, name, text))
    };

    let stats = Stats {
        hp: stat(0, "hp")?,
        attack: stat(1, "attack")?,
        defense: stat(2, "defense")?,
        sp_attack: stat(3, "sp_attack")?,
        sp_defense: stat(4, "sp_defense")?,
        speed: stat(5, "speed")?,
    };

    Ok(Pokemon {
        id,
        identifier: normalize(&name),
        name,
        types,
        stats,
    })
}
