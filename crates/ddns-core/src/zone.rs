//! Zones and zone ownership

use serde::{Deserialize, Serialize};

/// A DNS zone managed under one provider account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    /// Provider zone ID
    pub id: String,
    /// Registrable domain suffix, e.g. `example.com`
    pub name: String,
    /// Provider-reported status (`active`, `pending`, ...)
    #[serde(default)]
    pub status: String,
}

impl Zone {
    /// Create a zone with an empty status
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: String::new(),
        }
    }

    /// Whether `name` ends with this zone's name
    pub fn owns(&self, name: &str) -> bool {
        name.ends_with(&self.name)
    }
}

/// First zone, in discovery order, whose name is a suffix of `name`.
///
/// Overlapping zones are not ranked: if both `example.com` and
/// `sub.example.com` are present, whichever was discovered first wins.
/// The comparison is a plain string suffix with no label-boundary check.
pub fn find_owning_zone<'a>(name: &str, zones: &'a [Zone]) -> Option<&'a Zone> {
    zones.iter().find(|zone| zone.owns(name))
}
