//! Label-keyed lookup tables with ordered fuzzy matching.
//!
//! A [`LookupTable`] holds `(key, value)` pairs in a fixed order and a
//! fallback value. A label is looked up by evaluating each [`LookupRule`] in
//! priority order against every key; the first rule with a matching key wins.

use serde::{Deserialize, Serialize};

/// How a label is compared with a table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupRule {
    /// Byte-for-byte equal
    Exact,
    /// Equal ignoring case
    CaseInsensitive,
    /// One contains the other, ignoring case
    Substring,
}

impl LookupRule {
    /// Evaluation order used by [`LookupTable::lookup`].
    pub const PRIORITY: [Self; 3] = [Self::Exact, Self::CaseInsensitive, Self::Substring];

    #[must_use]
    pub fn matches(self, key: &str, label: &str) -> bool {
        match self {
            Self::Exact => key == label,
            Self::CaseInsensitive => key.to_lowercase() == label.to_lowercase(),
            Self::Substring => {
                let key = key.to_lowercase();
                let label = label.to_lowercase();
                !key.is_empty()
                    && !label.is_empty()
                    && (key.contains(&label) || label.contains(&key))
            }
        }
    }
}

impl std::fmt::Display for LookupRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::CaseInsensitive => write!(f, "case-insensitive"),
            Self::Substring => write!(f, "substring"),
        }
    }
}

/// Result of a table lookup.
#[derive(Debug, Clone, Copy)]
pub struct Lookup<'a, V> {
    pub value: &'a V,
    /// Key that matched, `None` when the fallback was used
    pub key: Option<&'a str>,
    /// Rule that matched, `None` when the fallback was used
    pub rule: Option<LookupRule>,
}

impl<V> Lookup<'_, V> {
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.rule.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct LookupTable<V> {
    entries: Vec<(String, V)>,
    fallback: V,
}

impl<V> LookupTable<V> {
    #[must_use]
    pub const fn new(entries: Vec<(String, V)>, fallback: V) -> Self {
        Self { entries, fallback }
    }

    /// Find the value for a label, falling back when no rule matches.
    #[must_use]
    pub fn lookup(&self, label: &str) -> Lookup<'_, V> {
        let label = label.trim();
        for rule in LookupRule::PRIORITY {
            if let Some((key, value)) = self.entries.iter().find(|(k, _)| rule.matches(k, label)) {
                return Lookup {
                    value,
                    key: Some(key.as_str()),
                    rule: Some(rule),
                };
            }
        }

        Lookup {
            value: &self.fallback,
            key: None,
            rule: None,
        }
    }

    #[must_use]
    pub fn get(&self, label: &str) -> &V {
        self.lookup(label).value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LookupTable<&'static str> {
        LookupTable::new(
            vec![
                ("cold".to_string(), "lower"),
                ("Cold".to_string(), "exact"),
                ("Hepatitis A".to_string(), "liver"),
            ],
            "generic",
        )
    }

    #[test]
    fn exact_match_beats_earlier_case_insensitive_key() {
        let t = table();
        let hit = t.lookup("Cold");
        assert_eq!(*hit.value, "exact");
        assert_eq!(hit.rule, Some(LookupRule::Exact));
    }

    #[test]
    fn case_insensitive_match() {
        let t = table();
        let hit = t.lookup("HEPATITIS a");
        assert_eq!(*hit.value, "liver");
        assert_eq!(hit.rule, Some(LookupRule::CaseInsensitive));
    }

    #[test]
    fn substring_in_either_direction() {
        let t = table();
        assert_eq!(*t.get("Hepatitis"), "liver");
        assert_eq!(*t.get("Common Cold"), "lower");
        assert_eq!(t.lookup("Common Cold").key, Some("cold"));
    }

    #[test]
    fn unknown_label_uses_fallback() {
        let t = table();
        let hit = t.lookup("Malaria");
        assert!(hit.is_fallback());
        assert_eq!(*hit.value, "generic");
        assert_eq!(*t.get(""), "generic");
    }
}
