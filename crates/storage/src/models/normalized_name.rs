use std::fmt;

const ROMAN_SUFFIXES: [&str; 10] = ["i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x"];

/// A golfer display name in canonical "First Last[ Suffix]" order.
///
/// The statistics provider encodes names as `"Last, First[, Suffix...]"`.
/// Storing the provider form would make the same player look different from
/// profiles written by other ingestion paths, so every name written to the
/// `golfers` table goes through this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedGolferName(String);

impl NormalizedGolferName {
    /// Canonicalizes a provider-encoded name.
    ///
    /// # Examples
    ///
    /// ```
    /// use storage::models::NormalizedGolferName;
    ///
    /// let name = NormalizedGolferName::from_provider("Fitzpatrick, Matthew, Jr");
    /// assert_eq!(name.as_str(), "Matthew Fitzpatrick Jr.");
    ///
    /// // Names without a comma only have their whitespace collapsed
    /// let name = NormalizedGolferName::from_provider("  Tiger   Woods ");
    /// assert_eq!(name.as_str(), "Tiger Woods");
    /// ```
    pub fn from_provider(raw: &str) -> Self {
        if !raw.contains(',') {
            return Self(collapse_whitespace(raw));
        }

        let mut parts = raw.split(',').map(collapse_whitespace);
        let last = parts.next().unwrap_or_default();
        let first = parts.next().unwrap_or_default();
        let suffixes = parts.filter(|s| !s.is_empty()).map(|s| normalize_suffix(&s));

        let name = [first, last]
            .into_iter()
            .filter(|s| !s.is_empty())
            .chain(suffixes)
            .collect::<Vec<_>>()
            .join(" ");

        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedGolferName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_suffix(token: &str) -> String {
    let bare = token.trim_end_matches('.').to_lowercase();
    match bare.as_str() {
        "jr" => "Jr.".to_string(),
        "sr" => "Sr.".to_string(),
        roman if ROMAN_SUFFIXES.contains(&roman) => roman.to_uppercase(),
        _ => token.to_string(),
    }
}
