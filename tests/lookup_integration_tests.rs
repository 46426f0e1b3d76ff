//! Lookup workflow integration tests
//!
//! Full client runs against canned service responses through a mock
//! transport: URI and argument validation, URL construction, response
//! interpretation and domain object assembly.

mod common;

use common::mocks::MockHttpTransport;
use spotilook::{LookupClient, LookupError, RequestError, TransportError};

const TRACK_RESPONSE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<track xmlns="http://www.spotify.com/ns/music/1">
  <name>Rendez-vous</name>
  <artist href="spotify:artist:4mk1tYzvUVq5islQmV2VcK">
    <name>Front 242</name>
  </artist>
  <album href="spotify:album:3GDbUKd3LkuldJQxwnCVIW">
    <name>Pulse</name>
    <released>2003</released>
    <availability>
      <territories>BE DE FR</territories>
    </availability>
  </album>
  <id type="isrc">BEP010300050</id>
  <track-number>7</track-number>
  <length>224.0</length>
  <popularity>0.41</popularity>
</track>
"#;

const ALBUM_RESPONSE: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<album xmlns="http://www.spotify.com/ns/music/1">
  <name>Pulse</name>
  <artist href="spotify:artist:4mk1tYzvUVq5islQmV2VcK">
    <name>Front 242</name>
  </artist>
  <released>2003</released>
  <id type="upc">5413356680324</id>
  <availability>
    <territories>BE DE FR</territories>
  </availability>
</album>
"#;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn track_lookup_end_to_end() {
    init_logging();
    let transport = MockHttpTransport::with_success(TRACK_RESPONSE);
    let client = LookupClient::with_transport(transport);

    let track = client
        .lookup_track("spotify:track:2EcsvY9gt3fzCpwm9eYkC6", Some("albumdetail"))
        .unwrap();

    assert_eq!(track.title.as_deref(), Some("Rendez-vous"));
    assert_eq!(track.number.as_deref(), Some("7"));
    assert_eq!(track.length.as_deref(), Some("224.0"));
    assert_eq!(track.popularity.as_deref(), Some("0.41"));

    let artist = track.artist.as_ref().unwrap();
    assert_eq!(artist.name.as_deref(), Some("Front 242"));
    assert_eq!(
        artist.uri.as_deref(),
        Some("spotify:artist:4mk1tYzvUVq5islQmV2VcK")
    );

    let album = track.album.as_ref().unwrap();
    assert_eq!(album.title.as_deref(), Some("Pulse"));
    assert_eq!(album.released.as_deref(), Some("2003"));
    assert_eq!(album.availability.as_deref(), Some("BE DE FR"));
    assert_eq!(album.artist, track.artist);

    assert_eq!(track.ids["isrc"].value.as_deref(), Some("BEP010300050"));
}

#[test]
fn lookup_url_carries_uri_and_extras() {
    let transport = MockHttpTransport::with_success(TRACK_RESPONSE);
    let urls = {
        let client = LookupClient::with_transport(&transport);
        client
            .lookup_track("spotify:track:2EcsvY9gt3fzCpwm9eYkC6", Some("album"))
            .unwrap();
        transport.requested_urls()
    };

    assert_eq!(urls.len(), 1);
    assert!(urls[0].starts_with("http://ws.spotify.com/lookup/1/?"));
    assert!(urls[0].contains("uri=spotify%3Atrack%3A2EcsvY9gt3fzCpwm9eYkC6"));
    assert!(urls[0].contains("extras=album"));
}

#[test]
fn album_lookup_end_to_end() {
    let transport = MockHttpTransport::with_success(ALBUM_RESPONSE);
    let client = LookupClient::with_transport(transport);

    let album = client
        .lookup_album("spotify:album:3GDbUKd3LkuldJQxwnCVIW", None)
        .unwrap();

    assert_eq!(album.title.as_deref(), Some("Pulse"));
    assert_eq!(album.released.as_deref(), Some("2003"));
    assert_eq!(album.availability.as_deref(), Some("BE DE FR"));
    assert_eq!(
        album.uri.as_deref(),
        Some("spotify:album:3GDbUKd3LkuldJQxwnCVIW")
    );
    assert_eq!(album.ids["upc"].value.as_deref(), Some("5413356680324"));

    let artist = album.artist.unwrap();
    assert_eq!(artist.name.as_deref(), Some("Front 242"));
}

#[test]
fn missing_optional_fields_are_absent_not_errors() {
    let transport =
        MockHttpTransport::with_success(b"<track><name>Sparse</name></track>");
    let client = LookupClient::with_transport(transport);

    let track = client
        .lookup_track("spotify:track:2EcsvY9gt3fzCpwm9eYkC6", None)
        .unwrap();

    assert_eq!(track.title.as_deref(), Some("Sparse"));
    assert!(track.artist.is_none());
    assert!(track.number.is_none());
    assert!(track.ids.is_empty());
    // The album struct is assembled but entirely empty.
    let album = track.album.unwrap();
    assert!(album.title.is_none());
    assert!(album.availability.is_none());
}

#[test]
fn http_failure_surfaces_as_transport_error() {
    let transport = MockHttpTransport::with_status(503);
    let client = LookupClient::with_transport(transport);

    let err = client
        .lookup_track("spotify:track:2EcsvY9gt3fzCpwm9eYkC6", None)
        .unwrap_err();
    match err {
        LookupError::Transport(TransportError::HttpStatus { status, .. }) => {
            assert_eq!(status, 503)
        }
        other => panic!("Expected transport error, got {other:?}"),
    }
}

#[test]
fn bad_arguments_fail_without_touching_the_network() {
    let transport = MockHttpTransport::with_success(TRACK_RESPONSE);
    let urls = {
        let client = LookupClient::with_transport(&transport);
        let err = client
            .lookup_track("spotify:track:2EcsvY9gt3fzCpwm9eYkC6", Some("everything"))
            .unwrap_err();
        assert!(matches!(
            err,
            LookupError::Request(RequestError::UnsupportedValue { .. })
        ));
        transport.requested_urls()
    };
    assert!(urls.is_empty());
}
