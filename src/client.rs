//! The lookup client.
//!
//! Ties the collaborators together: validates the Spotify URI, builds and
//! validates the request, fetches the response through the transport, runs
//! the interpreter over the parsed XML and assembles the domain structs
//! from path queries on the normalized view.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use log::debug;
use regex::Regex;
use reqwest::Url;

use crate::document::{FlattenedDocument, InterpretedDocument, Record};
use crate::error::{DocumentError, RequestError, Result};
use crate::model::{Album, Artist, ExternalId, Track};
use crate::request::{LookupAction, LookupRequest};
use crate::transport::{HttpConfig, HttpTransport, Transport};

/// Base URL of the Spotify Metadata API lookup service
pub const SERVICE_BASE: &str = "http://ws.spotify.com/lookup/1/";

/// Cached regex for Spotify URI validation
static SPOTIFY_URI_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get or initialize the Spotify URI regex
fn spotify_uri_regex() -> &'static Regex {
    SPOTIFY_URI_REGEX.get_or_init(|| {
        Regex::new(r"(?i)spotify:(artist|album|track):.*?[a-z]+[0-9]+[a-z0-9]*")
            .expect("Failed to compile Spotify URI regex")
    })
}

/// Reject a URI that does not look like `spotify:<kind>:<id>` before any
/// network call is made.
fn validate_uri(uri: &str) -> std::result::Result<(), RequestError> {
    if spotify_uri_regex().is_match(uri) {
        Ok(())
    } else {
        Err(RequestError::InvalidUri {
            uri: uri.to_string(),
        })
    }
}

/// Client for the lookup service, generic over the transport so tests can
/// substitute canned responses.
pub struct LookupClient<T: Transport = HttpTransport> {
    service_base: Url,
    transport: T,
}

impl LookupClient<HttpTransport> {
    /// Create a client with the default HTTP transport
    pub fn new() -> Result<Self> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a client with a custom HTTP configuration
    pub fn with_config(config: HttpConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> LookupClient<T> {
    /// Create a client over an arbitrary transport, talking to the standard
    /// service base URL.
    pub fn with_transport(transport: T) -> Self {
        let service_base = Url::parse(SERVICE_BASE).expect("Failed to parse service base URL");
        Self {
            service_base,
            transport,
        }
    }

    /// Override the service base URL
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.service_base = base;
        self
    }

    /// Look up a track by Spotify URI.
    ///
    /// `extras` is passed through to the service and must be one of the
    /// values the track action accepts (`album`, `albumdetail`, `track`,
    /// `trackdetail`).
    pub fn lookup_track(&self, uri: &str, extras: Option<&str>) -> Result<Track> {
        let interpreted = self.perform(LookupAction::Track, uri, extras)?;
        let doc = interpreted.normalized();

        let artist = assemble_artist(doc);
        let album = Album {
            title: text_of(doc.get_tag(&["album", "name"])),
            uri: attr_of(doc.get_tag(&["album"]), "href"),
            released: text_of(doc.get_tag(&["album", "released"])),
            availability: track_album_availability(doc),
            artist: artist.clone(),
            ids: Default::default(),
        };

        Ok(Track {
            title: text_of(doc.get_tag(&["name"])),
            uri: Some(uri.to_string()),
            number: text_of(doc.get_tag(&["track-number"])),
            length: text_of(doc.get_tag(&["length"])),
            popularity: text_of(doc.get_tag(&["popularity"])),
            disc_number: text_of(doc.get_tag(&["disc-number"])),
            artist,
            album: Some(album),
            ids: external_ids(doc),
        })
    }

    /// Look up an album by Spotify URI.
    pub fn lookup_album(&self, uri: &str, extras: Option<&str>) -> Result<Album> {
        let interpreted = self.perform(LookupAction::Album, uri, extras)?;
        let doc = interpreted.normalized();

        Ok(Album {
            title: text_of(doc.get_tag(&["name"])),
            uri: Some(uri.to_string()),
            released: text_of(doc.get_tag(&["released"])),
            availability: text_of(doc.get_tag(&["availability", "territories"])),
            artist: assemble_artist(doc),
            ids: external_ids(doc),
        })
    }

    /// Look up an artist by Spotify URI.
    pub fn lookup_artist(&self, uri: &str, extras: Option<&str>) -> Result<Artist> {
        let interpreted = self.perform(LookupAction::Artist, uri, extras)?;
        let doc = interpreted.normalized();

        Ok(Artist {
            name: text_of(doc.get_tag(&["name"])),
            uri: Some(uri.to_string()),
        })
    }

    /// Shared lookup pipeline: validate, fetch, parse, flatten.
    fn perform(
        &self,
        action: LookupAction,
        uri: &str,
        extras: Option<&str>,
    ) -> Result<InterpretedDocument> {
        validate_uri(uri)?;

        let mut args = BTreeMap::new();
        args.insert("uri".to_string(), uri.to_string());
        if let Some(extras) = extras {
            args.insert("extras".to_string(), extras.to_string());
        }

        let request = LookupRequest::new(action, args)?;
        let url = request.url(&self.service_base)?;
        debug!("{} lookup: {}", action.name(), url);

        let bytes = self.transport.fetch(&url)?;
        let text = std::str::from_utf8(&bytes).map_err(DocumentError::from)?;
        Ok(InterpretedDocument::parse(text)?)
    }
}

/// The `artist` element appears as a root section in track and album
/// responses; in artist responses the fields live at the top level instead,
/// so this returns `None` there and the caller assembles directly.
fn assemble_artist(doc: &FlattenedDocument) -> Option<Artist> {
    let name = text_of(doc.get_tag(&["artist", "name"]));
    let uri = attr_of(doc.get_tag(&["artist"]), "href");
    if name.is_none() && uri.is_none() {
        return None;
    }
    Some(Artist { name, uri })
}

/// Availability of the album embedded in a track response.
///
/// The `territories` record sits at a varying position inside the album
/// section: the service emits `name`, and with detailed extras also
/// `released` and ids, before `availability`, so the positional parent
/// index a path query expects does not hold here. Resolve it structurally
/// instead: the `territories` record whose parent record is tagged
/// `availability`, within the first album section. The last match wins,
/// consistent with path scans over the same section.
fn track_album_availability(doc: &FlattenedDocument) -> Option<String> {
    let section_index = *doc.sections_rooted_at("album").first()?;
    let records = doc.sections()[section_index].records();

    let mut found = None;
    for record in records {
        let under_availability = record
            .parent
            .and_then(|p| records.get(p))
            .is_some_and(|p| p.tag == "availability");
        if record.tag == "territories" && under_availability {
            found = Some(record);
        }
    }
    found.and_then(|r| r.text.clone())
}

/// Collect the response's `id` sections into a map keyed by their `type`
/// attribute. Ids without a type attribute are dropped.
fn external_ids(doc: &FlattenedDocument) -> std::collections::HashMap<String, ExternalId> {
    doc.get_tags("id")
        .into_iter()
        .filter_map(|record| {
            record.attr("type").map(|t| {
                (
                    t.to_string(),
                    ExternalId {
                        value: record.text.clone(),
                        href: record.attr("href").map(str::to_string),
                    },
                )
            })
        })
        .collect()
}

fn text_of(record: Option<&Record>) -> Option<String> {
    record.and_then(|r| r.text.clone())
}

fn attr_of(record: Option<&Record>, name: &str) -> Option<String> {
    record.and_then(|r| r.attr(name).map(str::to_string))
}
