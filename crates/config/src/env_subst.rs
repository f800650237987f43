/// Replace `${ENV_VAR}` placeholders in the raw config text.
///
/// Unresolvable or unterminated placeholders are left untouched.
pub fn substitute_env(input: &str) -> String {
    substitute_with(input, |name| std::env::var(name).ok())
}

fn substitute_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match lookup(name).filter(|_| !name.is_empty()) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + 2 + end + 1]),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(name: &str) -> Option<String> {
        match name {
            "CFBOT_TOKEN" => Some("123:abc".to_string()),
            "EMPTY" => Some(String::new()),
            _ => None,
        }
    }

    #[test]
    fn replaces_known_variable() {
        assert_eq!(
            substitute_with("token = \"${CFBOT_TOKEN}\"", lookup),
            "token = \"123:abc\""
        );
    }

    #[test]
    fn keeps_unknown_variable() {
        assert_eq!(substitute_with("${NOPE} x", lookup), "${NOPE} x");
    }

    #[test]
    fn keeps_unterminated_placeholder() {
        assert_eq!(substitute_with("a ${CFBOT_TOKEN", lookup), "a ${CFBOT_TOKEN");
    }

    #[test]
    fn multiple_and_empty_values() {
        assert_eq!(
            substitute_with("${CFBOT_TOKEN}/${EMPTY}/${}", lookup),
            "123:abc//${}"
        );
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}
