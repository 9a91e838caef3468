//! Allowlist enforcement.
//!
//! Deny-by-default: an empty `allow_users` list means no one is allowed.
//! Wildcard `"*"` allows everyone. Entries may include or omit the leading
//! `@` for usernames, or be numeric Telegram user ids.

/// Returns `true` when the given Telegram user may interact with the bot.
///
/// All matching is case-sensitive, following the Telegram API.
pub fn is_allowed(allow_users: &[String], username: &str, user_id: &str) -> bool {
    if allow_users.is_empty() {
        return false;
    }
    allow_users.iter().any(|entry| {
        let entry = entry.trim_start_matches('@');
        entry == "*" || entry == username || entry == user_id
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn empty_list_denies_everyone() {
        assert!(!is_allowed(&[], "alice", "111"));
    }

    #[test]
    fn wildcard_allows_everyone() {
        assert!(is_allowed(&list(&["*"]), "alice", "111"));
        assert!(is_allowed(&list(&["*"]), "", "999"));
    }

    #[test]
    fn matches_numeric_user_id() {
        assert!(is_allowed(&list(&["123456789"]), "", "123456789"));
        assert!(!is_allowed(&list(&["123456789"]), "alice", "111"));
    }

    #[test]
    fn matches_username_with_or_without_at() {
        assert!(is_allowed(&list(&["alice"]), "alice", "111"));
        assert!(is_allowed(&list(&["@alice"]), "alice", "111"));
        assert!(!is_allowed(&list(&["@alice"]), "bob", "222"));
    }

    #[test]
    fn any_entry_may_match() {
        let entries = list(&["alice", "987654321"]);
        assert!(is_allowed(&entries, "alice", "111"));
        assert!(is_allowed(&entries, "bob", "987654321"));
        assert!(!is_allowed(&entries, "charlie", "000"));
    }

    #[test]
    fn username_match_is_case_sensitive() {
        assert!(is_allowed(&list(&["Alice"]), "Alice", "1"));
        assert!(!is_allowed(&list(&["Alice"]), "alice", "1"));
    }
}
