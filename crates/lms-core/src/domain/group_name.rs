//! Canonical group keys.
//!
//! Institutional groups are keyed by the normalized form of a student's
//! headline, so two spellings of the same institution land in one group.
//! Explicit group names go through the same function.

/// Characters that act as word separators in a group name.
fn is_separator(c: char) -> bool {
    matches!(c, ',' | '.' | '-' | '_' | '(' | ')' | ' ')
}

/// Uppercases, then collapses every run of `, . - _ ( )` and spaces into a
/// single space, trimming both ends.
pub fn normalize_group_name(raw: &str) -> String {
    let upper = raw.to_uppercase();
    let mut out = String::with_capacity(upper.len());
    let mut pending_space = false;

    for c in upper.trim().chars() {
        if is_separator(c) {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_punctuation_and_spaces() {
        assert_eq!(normalize_group_name("ABC  College, -  "), "ABC COLLEGE");
        assert_eq!(normalize_group_name("  iit (bombay)  "), "IIT BOMBAY");
        assert_eq!(normalize_group_name("st._xavier's-college"), "ST XAVIER'S COLLEGE");
    }

    #[test]
    fn test_normalize_variants_share_a_key() {
        let a = normalize_group_name("ABC College");
        let b = normalize_group_name("abc  college.");
        let c = normalize_group_name("(ABC)-college");
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let samples = [
            "",
            "   ",
            "---",
            "ABC  College, -  ",
            "m.i.t.",
            "Université de Genève",
            "\tTabbed\tName\n",
            "a__b--c..d,,e((f))g",
        ];
        for s in samples {
            let once = normalize_group_name(s);
            assert_eq!(normalize_group_name(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_normalize_separator_only_input_is_empty() {
        assert_eq!(normalize_group_name(" ,.-_() "), "");
    }

    #[test]
    fn test_other_whitespace_is_kept_inside() {
        // Only the listed separators collapse; tabs inside survive, edges are trimmed.
        assert_eq!(normalize_group_name("\tA\tB\t"), "A\tB");
    }
}
