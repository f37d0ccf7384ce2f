/// Skill estimate the provider reports for players it has not ranked.
pub const DEFAULT_SKILL_ESTIMATE: f64 = -1.875;

pub const MAX_RATING: f64 = 150.0;

/// Maps a provider skill estimate onto the 0-150 display rating.
///
/// Piecewise: below -1.5 the rating runs 0-5, between -1.5 and 2 it is linear
/// from 5 to 100, and above 2 it grows with the square root of the excess
/// up to the 150 ceiling. Each branch rounds to two decimals. Non-finite input
/// maps to 0.
pub fn normalize_rating(skill_estimate: f64) -> f64 {
    let x = skill_estimate;
    if !x.is_finite() {
        return 0.0;
    }

    if x < -1.5 {
        round2((5.0 + ((x + 1.5) / 1.5) * 5.0).clamp(0.0, 5.0))
    } else if x <= 2.0 {
        round2((5.0 + ((x + 1.5) / 3.5) * 95.0).max(0.0))
    } else {
        round2((100.0 + 20.0 * ((x - 2.0) / 1.5).sqrt()).min(MAX_RATING))
    }
}

/// Rating used when no skill estimate has ever been seen for a player.
pub fn fallback_rating() -> f64 {
    normalize_rating(DEFAULT_SKILL_ESTIMATE)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
