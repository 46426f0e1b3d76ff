//! # spotilook
//!
//! Synchronous client for the Spotify Metadata API lookup service. The
//! service answers a lookup with an XML document describing a track, album
//! or artist; this crate flattens that document into an addressable
//! structure and answers path queries over it without re-walking the tree.
//!
//! ```no_run
//! use spotilook::LookupClient;
//!
//! let client = LookupClient::new()?;
//! let track = client.lookup_track("spotify:track:6NmXV4o6bmp704aPGyTVVG", None)?;
//! println!("{:?} by {:?}", track.title, track.artist);
//! # Ok::<(), spotilook::LookupError>(())
//! ```

pub mod client;
pub mod document;
pub mod error;
pub mod model;
pub mod normalize;
pub mod query;
pub mod request;
pub mod transport;

pub use client::{LookupClient, SERVICE_BASE};
pub use document::{FlattenedDocument, InterpretedDocument, Record, Section};
pub use error::{DocumentError, LookupError, RequestError, Result, TransportError};
pub use model::{Album, Artist, ExternalId, Track};
pub use request::{LookupAction, LookupRequest};
pub use transport::{HttpConfig, HttpTransport, Transport};
