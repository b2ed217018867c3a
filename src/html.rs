//! Small helpers over `scraper` for the table-shaped pages we read.

use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

pub static BODY_ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tbody tr").unwrap());
pub static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
pub static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
pub static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Text content of an element with whitespace collapsed and trimmed.
pub fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

/// Collapse runs of whitespace (including nbsp) into single spaces and trim.
pub fn normalize_ws(s: &str) -> String {
    s.split(|c: char| c.is_whitespace() || c == '\u{a0}')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `<td>` children of a row, in order.
pub fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.select(&TD).collect()
}

/// Header labels of a table, in order.
pub fn headers(table: ElementRef<'_>) -> Vec<String> {
    table.select(&TH).map(text_of).collect()
}

/// Data rows of a table (inside `<tbody>`).
pub fn body_rows(table: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    table.select(&BODY_ROW).collect()
}

/// Text of the first `<a>` inside an element.
pub fn anchor_text(el: ElementRef<'_>) -> Option<String> {
    el.select(&ANCHOR).next().map(text_of)
}

/// Digits-only text to a number; anything else ("—", "∞", blank) is 0.
pub fn parse_num(text: &str) -> u32 {
    let t = text.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    t.parse().unwrap_or(0)
}
