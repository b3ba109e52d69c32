use once_cell::sync::Lazy;
use regex::Regex;

use crate::reference::Kind;

/// Matches `ref+<scheme>://<target>` and `secretref+<scheme>://<target>`,
/// consuming one optional trailing `+` as a delimiter.
static REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"((secret)?ref)\+([^+:]*://[^+\n ]+)\+?").expect("reference regex should compile")
});

/// Finds reference tokens in strings, honoring an allow-list of kinds.
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    only: Vec<Kind>,
}

impl Matcher {
    /// Creates a matcher. An empty allow-list allows every kind.
    pub fn new(only: impl IntoIterator<Item = Kind>) -> Self {
        Self {
            only: only.into_iter().collect(),
        }
    }

    pub fn allows(&self, kind: Kind) -> bool {
        self.only.is_empty() || self.only.contains(&kind)
    }

    /// Returns `true` if `s` contains any reference token, allowed or not.
    pub fn contains_reference(s: &str) -> bool {
        REFERENCE_PATTERN.is_match(s)
    }

    /// Returns the target when the whole of `s` is exactly one allowed reference.
    pub fn whole_reference<'a>(&self, s: &'a str) -> Option<&'a str> {
        let caps = REFERENCE_PATTERN.captures(s)?;
        let token = caps.get(0)?;
        if token.start() != 0 || token.end() != s.len() {
            return None;
        }
        if !self.allows(kind_of(&caps[1])) {
            return None;
        }
        caps.get(3).map(|target| target.as_str())
    }

    /// Replaces allowed reference tokens in `s` with the result of `lookup`.
    ///
    /// `lookup` receives the target (`scheme://...`) without the kind prefix
    /// or trailing delimiter. Scanning stops at the first token whose kind is
    /// not allowed; it and everything after it are kept verbatim.
    pub fn expand<F, E>(&self, s: &str, mut lookup: F) -> Result<String, E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;

        while let Some(caps) = REFERENCE_PATTERN.captures(rest) {
            let (Some(token), Some(target)) = (caps.get(0), caps.get(3)) else {
                break;
            };
            if !self.allows(kind_of(&caps[1])) {
                break;
            }

            result.push_str(&rest[..token.start()]);
            result.push_str(&lookup(target.as_str())?);
            rest = &rest[token.end()..];
        }

        result.push_str(rest);
        Ok(result)
    }
}

fn kind_of(prefix: &str) -> Kind {
    if prefix == "secretref" {
        Kind::SecretRef
    } else {
        Kind::Ref
    }
}
