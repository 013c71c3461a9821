//! Fixed vocabularies used by the scorer: investment capacity brackets and
//! professional role groups.

/// Investment capacity brackets, lowest first
pub const CAPACITY_BRACKETS: [&str; 6] = [
    "Under $100K",
    "$100K - $250K",
    "$250K - $500K",
    "$500K - $1M",
    "$1M - $5M",
    "Over $5M",
];

/// Role groups; members are matched as case-insensitive substrings of a role
pub const ROLE_GROUPS: [&[&str]; 4] = [
    &["Real Estate Agent", "Realtor", "Broker"],
    &["Property Developer", "Developer"],
    &["Investment Advisor", "Financial Advisor"],
    &["Property Manager"],
];

/// Index of a capacity label in [`CAPACITY_BRACKETS`], exact match only
#[inline]
pub fn capacity_index(label: &str) -> Option<usize> {
    CAPACITY_BRACKETS.iter().position(|bracket| *bracket == label)
}

/// Index of the role group a role description belongs to
///
/// Every group is checked and the last one that matches wins, so
/// "Broker and Property Manager" lands in the property manager group.
pub fn role_group(role: &str) -> Option<usize> {
    let role = role.to_lowercase();

    ROLE_GROUPS
        .iter()
        .enumerate()
        .filter(|(_, members)| {
            members
                .iter()
                .any(|member| role.contains(&member.to_lowercase()))
        })
        .map(|(index, _)| index)
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_index() {
        assert_eq!(capacity_index("Under $100K"), Some(0));
        assert_eq!(capacity_index("Over $5M"), Some(5));
        assert_eq!(capacity_index("over $5m"), None);
        assert_eq!(capacity_index(""), None);
    }

    #[test]
    fn test_role_group_substring_case_insensitive() {
        assert_eq!(role_group("Senior REALTOR"), Some(0));
        assert_eq!(role_group("Commercial property developer"), Some(1));
        assert_eq!(role_group("Independent Financial Advisor"), Some(2));
        assert_eq!(role_group("Property Manager"), Some(3));
        assert_eq!(role_group("Architect"), None);
    }

    #[test]
    fn test_role_group_last_match_wins() {
        assert_eq!(role_group("Broker and Property Manager"), Some(3));
        assert_eq!(role_group("Developer / Realtor"), Some(1));
    }
}
