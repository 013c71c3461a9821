use crate::core::categories::{capacity_index, role_group};
use crate::core::location::{compare_locations, LocationMatch};
use crate::models::Profile;

/// Upper bound of a match score
pub const MAX_SCORE: u8 = 100;

/// Points and reason contributed by one factor that fired
type FactorScore = (u8, String);

/// Calculate a match score (0-100) between a user and a candidate profile
///
/// Scoring formula (points, evaluated in this order):
/// score = (
///     location     # 20 same location, 15 same city
///   + specialties  # 10 per shared specialty, max 30
///   + experience   # 15 / 10 / 5 by difference in years
///   + capacity     # 15 adjacent, 10 equal, 5 otherwise
///   + role         # 20 complementary groups, 10 same group
/// )
///
/// A factor whose inputs are missing on either side contributes nothing and
/// adds no reason. Reasons come back in evaluation order.
pub fn calculate_match_score(user: &Profile, candidate: &Profile) -> (u8, Vec<String>) {
    let factors = [
        location_score(user, candidate),
        specialty_score(user, candidate),
        experience_score(user, candidate),
        capacity_score(user, candidate),
        role_score(user, candidate),
    ];

    let mut total: i32 = 0;
    let mut reasons = Vec::with_capacity(factors.len());
    for (points, reason) in factors.into_iter().flatten() {
        total += i32::from(points);
        reasons.push(reason);
    }

    (clamp_score(total), reasons)
}

#[inline]
fn clamp_score(total: i32) -> u8 {
    // Bounded by the clamp, so the cast cannot truncate
    total.clamp(0, i32::from(MAX_SCORE)) as u8
}

/// Location score: 20 for the same location, 15 for the same city
#[inline]
fn location_score(user: &Profile, candidate: &Profile) -> Option<FactorScore> {
    match compare_locations(user.location.as_deref(), candidate.location.as_deref()) {
        LocationMatch::Same => Some((20, "Same location".to_string())),
        LocationMatch::SameCity => Some((15, "Same city".to_string())),
        LocationMatch::None => None,
    }
}

/// Specialty score: 10 per shared specialty, capped at 30
///
/// Tags are compared exactly, case included. Shared tags are listed in the
/// user's order, each once.
#[inline]
fn specialty_score(user: &Profile, candidate: &Profile) -> Option<FactorScore> {
    let (Some(ours), Some(theirs)) = (&user.specialties, &candidate.specialties) else {
        return None;
    };

    let mut common: Vec<&str> = Vec::new();
    for specialty in ours {
        if theirs.contains(specialty) && !common.contains(&specialty.as_str()) {
            common.push(specialty);
        }
    }

    let points = (common.len().min(3) * 10) as u8;
    match common.as_slice() {
        [] => None,
        [only] => Some((points, format!("Common specialty: {}", only))),
        many => Some((points, format!("{} common specialties", many.len()))),
    }
}

/// Experience score: a wide gap is complementary, a narrow one merely matches
#[inline]
fn experience_score(user: &Profile, candidate: &Profile) -> Option<FactorScore> {
    let diff = user.experience?.abs_diff(candidate.experience?);

    let factor = if diff >= 5 {
        (15, "Complementary experience levels")
    } else if diff >= 2 {
        (10, "Similar experience levels")
    } else {
        (5, "Matching experience levels")
    };

    Some((factor.0, factor.1.to_string()))
}

/// Investment capacity score: neighbouring brackets complement each other best
#[inline]
fn capacity_score(user: &Profile, candidate: &Profile) -> Option<FactorScore> {
    let ours = capacity_index(user.investment_capacity.as_deref()?)?;
    let theirs = capacity_index(candidate.investment_capacity.as_deref()?)?;

    let factor = match ours.abs_diff(theirs) {
        0 => (10, "Matching investment capacity"),
        1 => (15, "Complementary investment capacity"),
        _ => (5, "Different investment capacity"),
    };

    Some((factor.0, factor.1.to_string()))
}

/// Role score: 20 across role groups, 10 within the same group
#[inline]
fn role_score(user: &Profile, candidate: &Profile) -> Option<FactorScore> {
    let ours = role_group(user.role.as_deref()?)?;
    let theirs = role_group(candidate.role.as_deref()?)?;

    if ours != theirs {
        Some((20, "Complementary professional roles".to_string()))
    } else {
        Some((10, "Similar professional background".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_profile(id: &str) -> Profile {
        Profile::new(id)
    }

    fn create_full_profile(
        id: &str,
        location: &str,
        specialties: &[&str],
        experience: i32,
        capacity: &str,
        role: &str,
    ) -> Profile {
        let mut profile = Profile::new(id);
        profile.location = Some(location.to_string());
        profile.specialties = Some(specialties.iter().map(|s| s.to_string()).collect());
        profile.experience = Some(experience);
        profile.investment_capacity = Some(capacity.to_string());
        profile.role = Some(role.to_string());
        profile
    }

    fn points(factor: Option<FactorScore>) -> u8 {
        factor.map(|(points, _)| points).unwrap_or(0)
    }

    #[test]
    fn test_empty_profiles_score_zero() {
        let (score, reasons) =
            calculate_match_score(&create_test_profile("a"), &create_test_profile("b"));

        assert_eq!(score, 0);
        assert!(reasons.is_empty());
    }

    #[test]
    fn test_same_location() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        user.location = Some("Miami, FL".to_string());
        candidate.location = Some("Miami, FL".to_string());

        assert_eq!(location_score(&user, &candidate), Some((20, "Same location".to_string())));
    }

    #[test]
    fn test_same_city() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        user.location = Some("Miami, FL".to_string());
        candidate.location = Some("Miami, TX".to_string());

        assert_eq!(location_score(&user, &candidate), Some((15, "Same city".to_string())));
    }

    #[test]
    fn test_blank_or_cityless_locations_score_nothing() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        user.location = Some("   ".to_string());
        candidate.location = Some("   ".to_string());

        assert_eq!(calculate_match_score(&user, &candidate), (0, vec![]));

        user.location = Some(", CO".to_string());
        candidate.location = Some(", TX".to_string());

        assert_eq!(location_score(&user, &candidate), None);
    }

    #[test]
    fn test_single_common_specialty() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        user.specialties = Some(vec!["Residential".to_string(), "Luxury".to_string()]);
        candidate.specialties = Some(vec!["Luxury".to_string(), "Retail".to_string()]);

        assert_eq!(
            specialty_score(&user, &candidate),
            Some((10, "Common specialty: Luxury".to_string()))
        );
    }

    #[test]
    fn test_specialties_capped_and_case_sensitive() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        let tags = ["Residential", "Luxury", "Retail", "Industrial"];
        user.specialties = Some(tags.iter().map(|s| s.to_string()).collect());
        candidate.specialties = Some(tags.iter().map(|s| s.to_string()).collect());

        assert_eq!(
            specialty_score(&user, &candidate),
            Some((30, "4 common specialties".to_string()))
        );

        candidate.specialties = Some(vec!["luxury".to_string()]);
        assert_eq!(specialty_score(&user, &candidate), None);
    }

    #[test]
    fn test_duplicate_specialty_counts_once() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        user.specialties = Some(vec!["Luxury".to_string(), "Luxury".to_string()]);
        candidate.specialties = Some(vec!["Luxury".to_string()]);

        assert_eq!(
            specialty_score(&user, &candidate),
            Some((10, "Common specialty: Luxury".to_string()))
        );
        assert_eq!(points(specialty_score(&candidate, &user)), 10);
    }

    #[test]
    fn test_experience_bands() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");

        user.experience = Some(3);
        candidate.experience = Some(9);
        assert_eq!(
            experience_score(&user, &candidate),
            Some((15, "Complementary experience levels".to_string()))
        );

        candidate.experience = Some(5);
        assert_eq!(
            experience_score(&user, &candidate),
            Some((10, "Similar experience levels".to_string()))
        );

        candidate.experience = Some(4);
        assert_eq!(
            experience_score(&user, &candidate),
            Some((5, "Matching experience levels".to_string()))
        );

        candidate.experience = None;
        assert_eq!(experience_score(&user, &candidate), None);
    }

    #[test]
    fn test_zero_experience_is_present() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");
        user.experience = Some(0);
        candidate.experience = Some(0);

        assert_eq!(points(experience_score(&user, &candidate)), 5);
    }

    #[test]
    fn test_capacity_bands() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");

        user.investment_capacity = Some("$100K - $250K".to_string());
        candidate.investment_capacity = Some("$250K - $500K".to_string());
        assert_eq!(
            capacity_score(&user, &candidate),
            Some((15, "Complementary investment capacity".to_string()))
        );

        candidate.investment_capacity = Some("$100K - $250K".to_string());
        assert_eq!(
            capacity_score(&user, &candidate),
            Some((10, "Matching investment capacity".to_string()))
        );

        candidate.investment_capacity = Some("Over $5M".to_string());
        assert_eq!(
            capacity_score(&user, &candidate),
            Some((5, "Different investment capacity".to_string()))
        );

        candidate.investment_capacity = Some("About a million".to_string());
        assert_eq!(capacity_score(&user, &candidate), None);
    }

    #[test]
    fn test_role_groups() {
        let mut user = create_test_profile("a");
        let mut candidate = create_test_profile("b");

        user.role = Some("Realtor".to_string());
        candidate.role = Some("Property Developer".to_string());
        assert_eq!(
            role_score(&user, &candidate),
            Some((20, "Complementary professional roles".to_string()))
        );

        candidate.role = Some("Commercial Broker".to_string());
        assert_eq!(
            role_score(&user, &candidate),
            Some((10, "Similar professional background".to_string()))
        );

        candidate.role = Some("Photographer".to_string());
        assert_eq!(role_score(&user, &candidate), None);
    }

    #[test]
    fn test_factors_are_symmetric() {
        let a = create_full_profile("a", "Miami, FL", &["Luxury", "Retail"], 3, "Under $100K", "Broker");
        let b = create_full_profile("b", "miami, TX", &["Retail"], 12, "$500K - $1M", "Investment Advisor");

        assert_eq!(location_score(&a, &b), location_score(&b, &a));
        assert_eq!(specialty_score(&a, &b), specialty_score(&b, &a));
        assert_eq!(experience_score(&a, &b), experience_score(&b, &a));
        assert_eq!(capacity_score(&a, &b), capacity_score(&b, &a));
        assert_eq!(role_score(&a, &b), role_score(&b, &a));
        assert_eq!(calculate_match_score(&a, &b).0, calculate_match_score(&b, &a).0);
    }

    #[test]
    fn test_self_match_values() {
        let profile = create_full_profile(
            "a",
            "Austin, TX",
            &["Residential", "Multifamily"],
            8,
            "$1M - $5M",
            "Property Manager",
        );

        assert_eq!(points(location_score(&profile, &profile)), 20);
        assert_eq!(points(specialty_score(&profile, &profile)), 20);
        assert_eq!(points(experience_score(&profile, &profile)), 5);
        assert_eq!(points(capacity_score(&profile, &profile)), 10);
        assert_eq!(points(role_score(&profile, &profile)), 10);

        let (score, reasons) = calculate_match_score(&profile, &profile);
        assert_eq!(score, 65);
        assert_eq!(reasons.len(), 5);
    }

    #[test]
    fn test_maximum_score_and_reason_order() {
        let user = create_full_profile(
            "a",
            "Miami, FL",
            &["Residential", "Luxury", "Retail"],
            2,
            "$250K - $500K",
            "Realtor",
        );
        let candidate = create_full_profile(
            "b",
            "Miami, FL",
            &["Residential", "Luxury", "Retail"],
            15,
            "$500K - $1M",
            "Property Developer",
        );

        let (score, reasons) = calculate_match_score(&user, &candidate);

        assert_eq!(score, MAX_SCORE);
        assert_eq!(
            reasons,
            vec![
                "Same location",
                "3 common specialties",
                "Complementary experience levels",
                "Complementary investment capacity",
                "Complementary professional roles",
            ]
        );
    }

    #[test]
    fn test_clamp_score() {
        assert_eq!(clamp_score(-5), 0);
        assert_eq!(clamp_score(42), 42);
        assert_eq!(clamp_score(140), 100);
    }
}
