//! Lookup actions and argument validation.
//!
//! Each action the service supports carries a closed descriptor of its
//! required and optional arguments, including the allowed values for
//! constrained arguments such as `extras`. A request is validated in full
//! before any URL is constructed or any network call is made.

use std::collections::BTreeMap;

use reqwest::Url;

use crate::error::RequestError;

/// Allowed `extras` values for a track lookup
const TRACK_EXTRAS: &[&str] = &["album", "albumdetail", "track", "trackdetail"];
/// Allowed `extras` values for an album lookup
const ALBUM_EXTRAS: &[&str] = &["track", "trackdetail"];
/// Allowed `extras` values for an artist lookup
const ARTIST_EXTRAS: &[&str] = &["album", "albumdetail"];

/// One argument a lookup action accepts
#[derive(Debug)]
struct ArgSpec {
    name: &'static str,
    /// When present, the closed set of values the service accepts.
    allowed: Option<&'static [&'static str]>,
}

/// The closed argument sets of one action
#[derive(Debug)]
struct ActionDescriptor {
    required: &'static [ArgSpec],
    optional: &'static [ArgSpec],
}

static TRACK_ACTION: ActionDescriptor = ActionDescriptor {
    required: &[ArgSpec {
        name: "uri",
        allowed: None,
    }],
    optional: &[ArgSpec {
        name: "extras",
        allowed: Some(TRACK_EXTRAS),
    }],
};

static ALBUM_ACTION: ActionDescriptor = ActionDescriptor {
    required: &[ArgSpec {
        name: "uri",
        allowed: None,
    }],
    optional: &[ArgSpec {
        name: "extras",
        allowed: Some(ALBUM_EXTRAS),
    }],
};

static ARTIST_ACTION: ActionDescriptor = ActionDescriptor {
    required: &[ArgSpec {
        name: "uri",
        allowed: None,
    }],
    optional: &[ArgSpec {
        name: "extras",
        allowed: Some(ARTIST_EXTRAS),
    }],
};

/// The lookups the service supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupAction {
    Artist,
    Album,
    Track,
}

impl LookupAction {
    pub fn name(&self) -> &'static str {
        match self {
            LookupAction::Artist => "artist",
            LookupAction::Album => "album",
            LookupAction::Track => "track",
        }
    }

    fn descriptor(&self) -> &'static ActionDescriptor {
        match self {
            LookupAction::Artist => &ARTIST_ACTION,
            LookupAction::Album => &ALBUM_ACTION,
            LookupAction::Track => &TRACK_ACTION,
        }
    }
}

/// A validated lookup request: action plus argument map, ready to be turned
/// into a service URL.
#[derive(Debug)]
pub struct LookupRequest {
    action: LookupAction,
    args: BTreeMap<String, String>,
}

impl LookupRequest {
    /// Validate `args` against the action's descriptor.
    ///
    /// Checks, in order: every required argument is present, no unknown
    /// argument is passed, and every constrained argument carries one of
    /// its allowed values.
    pub fn new(
        action: LookupAction,
        args: BTreeMap<String, String>,
    ) -> Result<Self, RequestError> {
        let descriptor = action.descriptor();

        for spec in descriptor.required {
            if !args.contains_key(spec.name) {
                return Err(RequestError::MissingArgument {
                    action: action.name().to_string(),
                    argument: spec.name.to_string(),
                });
            }
        }

        let known = |name: &str| {
            descriptor
                .required
                .iter()
                .chain(descriptor.optional)
                .any(|spec| spec.name == name)
        };
        for name in args.keys() {
            if !known(name) {
                return Err(RequestError::UnsupportedArgument {
                    action: action.name().to_string(),
                    argument: name.clone(),
                });
            }
        }

        for spec in descriptor.required.iter().chain(descriptor.optional) {
            if let (Some(allowed), Some(value)) = (spec.allowed, args.get(spec.name))
                && !allowed.contains(&value.as_str())
            {
                return Err(RequestError::UnsupportedValue {
                    action: action.name().to_string(),
                    argument: spec.name.to_string(),
                    value: value.clone(),
                });
            }
        }

        Ok(Self { action, args })
    }

    pub fn action(&self) -> LookupAction {
        self.action
    }

    /// Construct the service URL by appending the arguments as a query
    /// string.
    pub fn url(&self, base: &Url) -> Result<Url, RequestError> {
        Url::parse_with_params(base.as_str(), &self.args).map_err(|e| {
            RequestError::InvalidBaseUrl {
                url: base.to_string(),
                details: e.to_string(),
            }
        })
    }
}
