use std::sync::LazyLock;

use anyhow::{anyhow, Context, Result};
use scraper::{Html, Selector};

use crate::html::{anchor_text, body_rows, cells, parse_num, text_of};
use crate::identifier::normalize;
use crate::model::{DamageClass, Move};
use crate::types::type_id;

static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

// Column layout of the moves listing: Name, Type, Cat., Power, Acc., PP, Effect, Prob.
const COL_NAME: usize = 0;
const COL_TYPE: usize = 1;
const COL_CATEGORY: usize = 2;
const COL_POWER: usize = 3;
const COL_ACCURACY: usize = 4;
const COL_PP: usize = 5;

/// Parse the generation move listing. Ids follow row order, starting at 1.
///
/// Any row missing one of the expected cells fails the whole listing.
pub fn extract(html: &str) -> Result<Vec<Move>> {
    let doc = Html::parse_document(html);
    let table = doc
        .select(&TABLE)
        .next()
        .ok_or_else(|| anyhow!("moves listing has no table"))?;

    body_rows(table)
        .into_iter()
        .enumerate()
        .map(|(i, row)| parse_row(i, &cells(row)).with_context(|| format!("moves row {}", i + 1)))
        .collect()
}

fn parse_row(index: usize, cols: &[scraper::ElementRef<'_>]) -> Result<Move> {
    let cell = |idx: usize, label: &str| {
        cols.get(idx)
            .copied()
            .ok_or_else(|| anyhow!("missing {} column (row has {} cells)", label, cols.len()))
    };

    let name = anchor_text(cell(COL_NAME, "name")?).ok_or_else(|| anyhow!("name cell has no link"))?;
    let type_name =
        anchor_text(cell(COL_TYPE, "type")?).ok_or_else(|| anyhow!("type cell has no link"))?;
    let category = cell(COL_CATEGORY, "category")?
        .value()
        .attr("data-sort-value")
        .unwrap_or_default();
    let power = parse_num(&text_of(cell(COL_POWER, "power")?));
    let accuracy = parse_num(&text_of(cell(COL_ACCURACY, "accuracy")?));
    let pp = parse_num(&text_of(cell(COL_PP, "pp")?));

    Ok(Move {
        id: index as u32 + 1,
        identifier: normalize(&name),
        name,
        type_id: type_id(&type_name),
        power,
        accuracy,
        pp,
        priority: 0,
        damage_class_id: DamageClass::from_category(category).id(),
    })
}
