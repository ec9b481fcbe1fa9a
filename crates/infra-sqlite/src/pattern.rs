// LIKE pattern helpers

/// `%pattern%` with LIKE wildcards in the input escaped by `\`, so the
/// query matches the input as a plain substring. Use with `ESCAPE '\'`.
pub(crate) fn contains_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('%');
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(contains_pattern("Lee"), "%Lee%");
    }

    #[test]
    fn test_wildcards_escaped() {
        assert_eq!(contains_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }
}
