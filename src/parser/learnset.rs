use std::collections::BTreeSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::html::{body_rows, cells, headers, text_of};
use crate::identifier::normalize;
use crate::model::MoveIndex;

static DATA_TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.data-table").unwrap());

const MOVE_HEADER: &str = "Move";

/// Moves found on one species' move page, plus what had to be dropped.
#[derive(Debug, Default)]
pub struct LearnsetPage {
    pub move_ids: BTreeSet<u32>,
    /// Move cells whose name isn't in the move listing.
    pub unresolved: Vec<String>,
    /// Rows too short to reach the Move column.
    pub malformed_rows: usize,
}

/// Fold every move table on the page (level-up, TM/HM, egg, tutor) into one set.
///
/// Tables without a "Move" header are ignored. Acquisition method and level are discarded.
pub fn extract(html: &str, index: &MoveIndex) -> LearnsetPage {
    let doc = Html::parse_document(html);
    let mut page = LearnsetPage::default();

    for table in doc.select(&DATA_TABLE) {
        let Some(move_col) = headers(table).iter().position(|h| h == MOVE_HEADER) else {
            continue;
        };

        for row in body_rows(table) {
            let cols = cells(row);
            let Some(cell) = cols.get(move_col) else {
                page.malformed_rows += 1;
                continue;
            };
            let name = text_of(*cell);
            match index.get(&normalize(&name)) {
                Some(id) => {
                    page.move_ids.insert(id);
                }
                None => page.unresolved.push(name),
            }
        }
    }

    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Move;

    fn index(names: &[&str]) -> MoveIndex {
        let moves: Vec<Move> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Move {
                id: i as u32 + 1,
                name: n.to_string(),
                identifier: normalize(n),
                type_id: 0,
                power: 0,
                accuracy: 0,
                pp: 0,
                priority: 0,
                damage_class_id: 0,
            })
            .collect();
        MoveIndex::from_moves(&moves)
    }

    #[test]
    fn charizard_page_folds_tables() {
        let html = std::fs::read_to_string("tests/fixtures/charizard_moves_1.html").unwrap();
        let idx = index(&["Ember", "Flamethrower", "Growl", "Leer", "Mega Punch", "Swords Dance", "Fire Spin"]);
        let page = extract(&html, &idx);

        // Ember (1), Flamethrower (2), Growl (3), Leer (4), Mega Punch (5), Swords Dance (6), Fire Spin (7)
        assert_eq!(page.move_ids.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5, 6, 7]);
        // Slash and Rage appear in the page but not in this index
        assert!(page.unresolved.contains(&"Slash".to_string()));
        assert!(page.unresolved.contains(&"Rage".to_string()));
        assert_eq!(page.malformed_rows, 1);
    }

    #[test]
    fn duplicate_moves_collapse() {
        let html = r#"<table class="data-table"><thead><tr><th>Lv.</th><th>Move</th></tr></thead><tbody>
            <tr><td>1</td><td><a>Transform</a></td></tr>
            </tbody></table>
            <table class="data-table"><thead><tr><th>TM</th><th>Move</th></tr></thead><tbody>
            <tr><td>50</td><td><a>Transform</a></td></tr>
            </tbody></table>"#;
        let page = extract(html, &index(&["Transform"]));
        assert_eq!(page.move_ids.len(), 1);
        assert!(page.move_ids.contains(&1));
    }

    #[test]
    fn tables_without_move_column_ignored() {
        let html = r#"<table class="data-table"><thead><tr><th>Stat</th><th>Value</th></tr></thead><tbody>
            <tr><td>Splash</td><td>1</td></tr></tbody></table>"#;
        let page = extract(html, &index(&["Splash"]));
        assert!(page.move_ids.is_empty());
        assert!(page.unresolved.is_empty());
    }

    #[test]
    fn move_column_found_by_label() {
        let html = r#"<table class="data-table"><thead><tr><th>Move</th><th>Type</th></tr></thead><tbody>
            <tr><td><a>Mr. Mime Punch</a></td><td>Psychic</td></tr>
            <tr><td><a>Splash</a></td><td>Normal</td></tr></tbody></table>"#;
        let page = extract(html, &index(&["Splash"]));
        assert_eq!(page.move_ids.iter().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(page.unresolved, vec!["Mr. Mime Punch".to_string()]);
    }
}
