use std::sync::LazyLock;

use regex::Regex;

static INVALID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9-]").unwrap());

/// Turn a display name into the lowercase-hyphenated slug used as a cross-reference key.
///
/// "Mr. Mime" → `mr-mime`, "Nidoran♀" → `nidoran-f`, "Farfetch'd" → `farfetchd`.
/// Every identifier in the datasets goes through here; learnset move cells are
/// resolved against move identifiers, so any divergence breaks the join silently.
pub fn normalize(name: &str) -> String {
    let lowered = name
        .to_lowercase()
        .replace('♀', "-f")
        .replace('♂', "-m")
        .replace(". ", "-")
        .replace(' ', "-");
    INVALID_RE.replace_all(&lowered, "").into_owned()
}
