/// How closely two free-text locations agree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMatch {
    /// Full strings equal, ignoring case and surrounding whitespace
    Same,
    /// Only the part before the first comma agrees (same city, other region)
    SameCity,
    None,
}

/// Normalize a location for comparison
///
/// Returns `None` for blank input so a whitespace-only location behaves
/// like a missing one.
#[inline]
pub fn normalize_location(location: &str) -> Option<String> {
    let trimmed = location.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Extract the city part of a location: the text before the first comma
///
/// "Miami, FL" -> "miami". A location without a comma is all city.
#[inline]
pub fn city_of(location: &str) -> String {
    location
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

/// Compare two optional locations
///
/// An empty city part (", CO") never produces a city match.
pub fn compare_locations(a: Option<&str>, b: Option<&str>) -> LocationMatch {
    let (Some(a), Some(b)) = (a, b) else {
        return LocationMatch::None;
    };
    let (Some(norm_a), Some(norm_b)) = (normalize_location(a), normalize_location(b)) else {
        return LocationMatch::None;
    };

    if norm_a == norm_b {
        return LocationMatch::Same;
    }

    let city_a = city_of(a);
    if !city_a.is_empty() && city_a == city_of(b) {
        LocationMatch::SameCity
    } else {
        LocationMatch::None
    }
}
