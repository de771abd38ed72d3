use regex::Regex;
use std::env;
use std::sync::OnceLock;

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

/// Expand environment variables in a string using ${VAR_NAME} syntax.
/// Unset variables are left as written.
pub fn expand_env_var_in_string(value: &str) -> String {
    env_var_pattern()
        .replace_all(value, |caps: &regex::Captures| {
            env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Accept `true`/`1`/`yes` (any case) as true, everything else as false
pub fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_set_variables_and_keeps_unset_ones() {
        env::set_var("CHATKEEP_TEST_DATA_DIR", "/var/lib/chatkeep");

        let expanded =
            expand_env_var_in_string("${CHATKEEP_TEST_DATA_DIR}/${CHATKEEP_TEST_UNSET_VAR}.db");

        assert_eq!(expanded, "/var/lib/chatkeep/${CHATKEEP_TEST_UNSET_VAR}.db");
    }

    #[test]
    fn flag_values() {
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("no"));
        assert!(!parse_flag(""));
    }
}
