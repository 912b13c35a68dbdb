//! Small helpers for writing Python source text.

/// Double-quoted Python string literal for `s`.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Snake-case module-level identifier derived from a region name.
///
/// Lower-cases, drops `.`, maps every other non-alphanumeric character to
/// `_` and collapses runs of `_`. A leading digit gets a `_` prefix.
pub fn identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch == '.' {
            continue;
        }
        let ch = if ch.is_alphanumeric() { ch } else { '_' };
        if ch == '_' && out.ends_with('_') {
            continue;
        }
        out.push(ch);
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(string_literal(r#"a "b" \c"#), r#""a \"b\" \\c""#);
        assert_eq!(string_literal("line\nbreak"), "\"line\\nbreak\"");
    }

    #[test]
    fn identifiers_follow_region_names() {
        assert_eq!(identifier("Abandoned Mine"), "abandoned_mine");
        assert_eq!(identifier("Lava Ruins - Upper"), "lava_ruins_upper");
        assert_eq!(identifier("St. Nobeta's Hall"), "st_nobeta_s_hall");
        assert_eq!(identifier("2nd Floor"), "_2nd_floor");
    }
}
