//! Account identifier validation for the serving flow.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

pub const MAX_INPUT_LEN: usize = 100;
pub const MAX_USERNAME_LEN: usize = 39;

const RESERVED_WORDS: [&str; 6] = ["api", "www", "mail", "ftp", "localhost", "admin"];

/// Prefixes a profile URL may carry, matched after lowercasing.
const PROFILE_PREFIXES: [&str; 3] = ["https://github.com/", "https://www.github.com/", "github.com/"];

static USERNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?$").expect("username pattern compiles")
});

/// Accepts a bare username or a GitHub profile URL and returns the
/// lowercased username.
pub fn validate_account_input(input: &str) -> Result<String> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(invalid("Input cannot be empty"));
    }
    if trimmed.chars().count() > MAX_INPUT_LEN {
        return Err(invalid("Input is too long"));
    }

    let username = extract_username(&trimmed.to_lowercase())
        .ok_or_else(|| invalid("Invalid GitHub URL format. Use: https://github.com/username"))?;

    if !USERNAME.is_match(&username) {
        return Err(invalid("Invalid GitHub username format"));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(invalid("GitHub username too long (max 39 characters)"));
    }
    if RESERVED_WORDS.contains(&username.as_str()) {
        return Err(invalid("Invalid username (reserved word)"));
    }

    Ok(username)
}

fn extract_username(lowered: &str) -> Option<String> {
    let candidate = PROFILE_PREFIXES
        .iter()
        .find_map(|prefix| lowered.strip_prefix(prefix))
        .map(|rest| rest.strip_suffix('/').unwrap_or(rest))
        .unwrap_or(lowered);

    USERNAME.is_match(candidate).then(|| candidate.to_string())
}

fn invalid(message: &str) -> Error {
    Error::InvalidInput(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejection(input: &str) -> String {
        validate_account_input(input).unwrap_err().user_message()
    }

    #[test]
    fn accepts_bare_usernames_and_profile_urls() {
        for input in [
            "octocat",
            "  OctoCat  ",
            "https://github.com/octocat",
            "https://github.com/OctoCat/",
            "https://www.github.com/octocat",
            "github.com/octocat/",
        ] {
            assert_eq!(validate_account_input(input).unwrap(), "octocat", "input {:?}", input);
        }
        assert_eq!(validate_account_input("a-b-c").unwrap(), "a-b-c");
        assert_eq!(validate_account_input("x").unwrap(), "x");
    }

    #[test]
    fn empty_and_oversized_input() {
        assert_eq!(rejection(""), "Input cannot be empty");
        assert_eq!(rejection("   "), "Input cannot be empty");
        assert_eq!(rejection(&"a".repeat(101)), "Input is too long");
    }

    #[test]
    fn malformed_identifiers() {
        for input in ["-octo", "octo-", "octo cat", "octo_cat", "http://github.com/octocat"] {
            assert!(validate_account_input(input).is_err(), "input {:?}", input);
        }
        assert_eq!(
            rejection("https://gitlab.com/octocat"),
            "Invalid GitHub URL format. Use: https://github.com/username"
        );
        assert!(validate_account_input("https://github.com/octocat/repo").is_err());
    }

    #[test]
    fn length_limit_applies_to_username() {
        assert!(validate_account_input(&"a".repeat(39)).is_ok());
        assert_eq!(
            rejection(&"a".repeat(40)),
            "GitHub username too long (max 39 characters)"
        );
    }

    #[test]
    fn reserved_words_rejected() {
        assert_eq!(rejection("admin"), "Invalid username (reserved word)");
        assert_eq!(rejection("https://github.com/API"), "Invalid username (reserved word)");
    }
}
