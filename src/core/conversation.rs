//! Member lookups shared by the filter, the aggregators and the exporters.

use std::collections::HashMap;

use crate::message::Member;

/// Finds the first member whose display name or nickname equals `username`.
///
/// Matching is exact and case-sensitive. When several members qualify the
/// earliest one in the list wins.
///
/// # Examples
///
/// ```
/// use gmkit::core::find_member;
/// use gmkit::message::Member;
///
/// let members = vec![
///     Member::new("u1", "Alice Smith", "Al"),
///     Member::new("u2", "Bob", "Al"),
/// ];
///
/// assert_eq!(find_member(&members, "Al").map(|m| m.user_id.as_str()), Some("u1"));
/// assert_eq!(find_member(&members, "Bob").map(|m| m.user_id.as_str()), Some("u2"));
/// assert!(find_member(&members, "bob").is_none());
/// ```
pub fn find_member<'a>(members: &'a [Member], username: &str) -> Option<&'a Member> {
    members
        .iter()
        .find(|m| m.name == username || m.nickname == username)
}

/// Maps user ids to account display names.
///
/// If a user id appears twice the first entry is kept.
pub fn member_names(members: &[Member]) -> HashMap<String, String> {
    let mut names = HashMap::with_capacity(members.len());
    for member in members {
        names
            .entry(member.user_id.clone())
            .or_insert_with(|| member.name.clone());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members() -> Vec<Member> {
        vec![
            Member::new("u1", "Alice", "Ally"),
            Member::new("u2", "Bob", "Robert"),
            Member::new("u1", "Alice Again", ""),
        ]
    }

    #[test]
    fn test_find_by_name_or_nickname() {
        let members = members();
        assert_eq!(find_member(&members, "Alice").unwrap().user_id, "u1");
        assert_eq!(find_member(&members, "Robert").unwrap().user_id, "u2");
        assert!(find_member(&members, "alice").is_none());
        assert!(find_member(&members, "Carol").is_none());
    }

    #[test]
    fn test_member_names_first_wins() {
        let names = member_names(&members());
        assert_eq!(names.len(), 2);
        assert_eq!(names["u1"], "Alice");
        assert_eq!(names["u2"], "Bob");
    }
}
