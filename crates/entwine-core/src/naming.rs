//! Identifier checks and case conversion.

/// Check whether `name` is a plain identifier: an ASCII letter or underscore
/// followed by ASCII letters, digits, or underscores.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}

/// Convert `PascalCase` / `camelCase` names to `snake_case`.
///
/// Acronym runs stay together, so `GitHub` becomes `git_hub` and
/// `HTTPServer` becomes `http_server`.
#[must_use]
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (idx, &ch) in chars.iter().enumerate() {
        if matches!(ch, '-' | ' ' | '_') {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            continue;
        }

        if ch.is_uppercase() && idx > 0 {
            let prev = chars[idx - 1];
            let next_is_lower = chars.get(idx + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }

        out.extend(ch.to_lowercase());
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("GitHub", "git_hub")]
    #[case("Discord", "discord")]
    #[case("Subscription", "subscription")]
    #[case("createdAt", "created_at")]
    #[case("userId", "user_id")]
    #[case("HTTPServer", "http_server")]
    #[case("already_snake", "already_snake")]
    fn snake_case_conversion(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(snake_case(input), expected);
    }

    #[rstest]
    #[case("id", true)]
    #[case("refersTo", true)]
    #[case("_hidden", true)]
    #[case("", false)]
    #[case("9lives", false)]
    #[case("TODO: Enums", false)]
    fn identifier_check(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_identifier(input), expected);
    }
}
