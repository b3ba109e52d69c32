//! Parsing of reference tokens.
//!
//! A reference has the form `ref+<scheme>://<authority><path>[?<query>][#<fragment>]`,
//! or the same with the `secretref+` prefix. Authority, path and fragment are
//! percent-decoded; the query is decoded as `application/x-www-form-urlencoded`.

use std::fmt;
use std::str::FromStr;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize};

use crate::Error;

/// The prefix a reference token starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Ref,
    SecretRef,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Ref => "ref",
            Kind::SecretRef => "secretref",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ref" => Ok(Kind::Ref),
            "secretref" => Ok(Kind::SecretRef),
            other => Err(Error::Parse {
                reference: other.to_string(),
                reason: "unknown reference kind, expected 'ref' or 'secretref'".to_string(),
            }),
        }
    }
}

/// A parsed reference. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    kind: Kind,
    target: String,
    scheme: String,
    authority: String,
    path: String,
    query: Vec<(String, String)>,
    fragment: Option<String>,
}

impl Reference {
    /// Parses a reference, with or without its `ref+`/`secretref+` prefix.
    ///
    /// Without a prefix the kind defaults to [`Kind::Ref`]. A single trailing
    /// `+` delimiter is ignored.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let (kind, target) = split_kind(input);
        let target = target.strip_suffix('+').unwrap_or(target);

        let fail = |reason: &str| Error::Parse {
            reference: input.to_string(),
            reason: reason.to_string(),
        };

        let (scheme, rest) = target
            .split_once("://")
            .ok_or_else(|| fail("missing '://' after scheme"))?;
        if !is_valid_scheme(scheme) {
            return Err(fail("invalid scheme"));
        }

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (rest, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, query),
            None => (rest, ""),
        };
        let (authority, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };

        let decode = |s: &str| {
            percent_decode_str(s)
                .decode_utf8()
                .map(|decoded| decoded.into_owned())
                .map_err(|_| fail("invalid percent-encoding"))
        };

        Ok(Self {
            kind,
            target: target.to_string(),
            scheme: scheme.to_string(),
            authority: decode(authority)?,
            path: decode(path)?,
            query: url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
            fragment: fragment.map(decode).transpose()?,
        })
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The reference without its kind prefix, e.g. `vault://kv/app?x=1#/password`.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// The target with any fragment removed. Every fragment lookup into the
    /// same structured value shares this key.
    pub fn root_target(&self) -> &str {
        self.target
            .split_once('#')
            .map_or(self.target.as_str(), |(root, _)| root)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query parameters in their original order.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// The path handed to a provider: authority and path joined, with leading
    /// separators removed.
    pub fn lookup_path(&self) -> String {
        let joined = format!("{}{}", self.authority, self.path);
        joined.trim_start_matches('/').to_string()
    }

    /// The fragment with leading `#` and `/` removed. Empty when absent.
    pub fn lookup_fragment(&self) -> &str {
        self.fragment
            .as_deref()
            .unwrap_or_default()
            .trim_start_matches(['#', '/'])
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.kind, self.target)
    }
}

fn split_kind(input: &str) -> (Kind, &str) {
    if let Some(target) = input.strip_prefix("secretref+") {
        (Kind::SecretRef, target)
    } else if let Some(target) = input.strip_prefix("ref+") {
        (Kind::Ref, target)
    } else {
        (Kind::Ref, input)
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
        }
        _ => false,
    }
}
