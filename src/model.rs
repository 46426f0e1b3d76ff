//! Domain model for catalogue entities.
//!
//! Plain data structs populated from interpreter query results. Every field
//! the service may omit is an `Option`; absence is ordinary, not an error.

use std::collections::HashMap;

use serde::Serialize;

/// An external catalogue identifier, keyed in the owning entity by its
/// `type` attribute (e.g. `isrc`, `upc`).
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ExternalId {
    pub value: Option<String>,
    pub href: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Artist {
    pub name: Option<String>,
    pub uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Album {
    pub title: Option<String>,
    pub uri: Option<String>,
    pub released: Option<String>,
    /// Space-separated territory codes where the album is available.
    pub availability: Option<String>,
    pub artist: Option<Artist>,
    pub ids: HashMap<String, ExternalId>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Track {
    pub title: Option<String>,
    pub uri: Option<String>,
    pub number: Option<String>,
    pub length: Option<String>,
    pub popularity: Option<String>,
    pub disc_number: Option<String>,
    pub artist: Option<Artist>,
    pub album: Option<Album>,
    pub ids: HashMap<String, ExternalId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_all_absent() {
        let track = Track::default();
        assert!(track.title.is_none());
        assert!(track.artist.is_none());
        assert!(track.ids.is_empty());
    }

    #[test]
    fn test_models_serialize() {
        let artist = Artist {
            name: Some("Nena".to_string()),
            uri: Some("spotify:artist:0cq8itfG2YSn5iIBLrdYCC".to_string()),
        };
        let json = serde_json::to_value(&artist).unwrap();
        assert_eq!(json["name"], "Nena");

        let mut ids = HashMap::new();
        ids.insert(
            "isrc".to_string(),
            ExternalId {
                value: Some("DEA268300178".to_string()),
                href: None,
            },
        );
        let track = Track {
            title: Some("99 Luftballons".to_string()),
            artist: Some(artist),
            ids,
            ..Default::default()
        };
        let json = serde_json::to_value(&track).unwrap();
        assert_eq!(json["ids"]["isrc"]["value"], "DEA268300178");
        assert_eq!(json["artist"]["name"], "Nena");
    }
}
