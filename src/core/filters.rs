use crate::models::{Profile, ProfileFilter, ProfilePage};

/// Case-insensitive substring test on an optional column
#[inline]
fn ilike(value: Option<&str>, needle: &str) -> bool {
    value
        .map(|v| v.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

/// Check if a profile satisfies every criterion of a search filter
///
/// Mirrors the hosted backend's query semantics so the in-memory repository
/// and the remote ones agree: a missing column never satisfies a criterion
/// that constrains it.
#[inline]
pub fn matches_filter(profile: &Profile, filter: &ProfileFilter) -> bool {
    if let Some(search) = &filter.search {
        if !ilike(profile.full_name.as_deref(), search) && !ilike(profile.bio.as_deref(), search) {
            return false;
        }
    }

    if let Some(location) = &filter.location {
        if !ilike(profile.location.as_deref(), location) {
            return false;
        }
    }

    // Overlap: at least one shared tag, exact match
    if !filter.specialties.is_empty() {
        let overlaps = profile
            .specialties
            .as_ref()
            .map(|tags| tags.iter().any(|tag| filter.specialties.contains(tag)))
            .unwrap_or(false);
        if !overlaps {
            return false;
        }
    }

    if let Some(min) = filter.min_experience {
        if !profile.experience.is_some_and(|years| years >= min) {
            return false;
        }
    }

    if let Some(max) = filter.max_experience {
        if !profile.experience.is_some_and(|years| years <= max) {
            return false;
        }
    }

    if let Some(capacity) = &filter.investment_capacity {
        if profile.investment_capacity.as_ref() != Some(capacity) {
            return false;
        }
    }

    true
}

/// Filter and page a set of profiles
///
/// `count` is the number of matching profiles before paging.
pub fn apply_filter<'a, I>(profiles: I, filter: &ProfileFilter) -> ProfilePage
where
    I: IntoIterator<Item = &'a Profile>,
{
    let matching: Vec<&Profile> = profiles
        .into_iter()
        .filter(|profile| matches_filter(profile, filter))
        .collect();
    let count = matching.len();

    let page: Vec<Profile> = match filter.page() {
        Some((offset, limit)) => matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect(),
        None => matching.into_iter().cloned().collect(),
    };

    ProfilePage {
        profiles: page,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile(id: &str, name: &str, location: &str, experience: Option<i32>) -> Profile {
        let mut profile = Profile::new(id);
        profile.full_name = Some(name.to_string());
        profile.location = Some(location.to_string());
        profile.experience = experience;
        profile.specialties = Some(vec!["Residential".to_string()]);
        profile.investment_capacity = Some("$100K - $250K".to_string());
        profile
    }

    #[test]
    fn test_search_matches_name_or_bio() {
        let mut profile = create_test_profile("1", "Dana Whitfield", "Tampa, FL", Some(5));
        profile.bio = Some("Flipping duplexes since 2015".to_string());

        let mut filter = ProfileFilter {
            search: Some("whit".to_string()),
            ..Default::default()
        };
        assert!(matches_filter(&profile, &filter));

        filter.search = Some("DUPLEX".to_string());
        assert!(matches_filter(&profile, &filter));

        filter.search = Some("condo".to_string());
        assert!(!matches_filter(&profile, &filter));
    }

    #[test]
    fn test_experience_bounds_exclude_missing() {
        let profile = create_test_profile("1", "A", "Tampa, FL", None);
        let filter = ProfileFilter {
            min_experience: Some(0),
            ..Default::default()
        };

        assert!(!matches_filter(&profile, &filter));
    }

    #[test]
    fn test_specialty_overlap_and_capacity() {
        let profile = create_test_profile("1", "A", "Tampa, FL", Some(3));

        let mut filter = ProfileFilter {
            specialties: vec!["Retail".to_string(), "Residential".to_string()],
            investment_capacity: Some("$100K - $250K".to_string()),
            ..Default::default()
        };
        assert!(matches_filter(&profile, &filter));

        filter.specialties = vec!["residential".to_string()];
        assert!(!matches_filter(&profile, &filter));
    }

    #[test]
    fn test_apply_filter_counts_before_paging() {
        let profiles: Vec<Profile> = (0..25)
            .map(|i| create_test_profile(&i.to_string(), "Agent", "Tampa, FL", Some(i)))
            .collect();

        let filter = ProfileFilter {
            location: Some("tampa".to_string()),
            min_experience: Some(5),
            offset: Some(10),
            ..Default::default()
        };

        let page = apply_filter(&profiles, &filter);

        assert_eq!(page.count, 20);
        assert_eq!(page.profiles.len(), 10);
        assert_eq!(page.profiles[0].id, "15");
    }
}
