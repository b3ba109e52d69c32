use crate::document::{Mapping, Value};
use crate::Error;

/// Walks `root` along the slash-separated `fragment` and returns the value found.
///
/// Mappings are indexed by key and sequences by position. Reaching a scalar
/// while segments remain is a depth mismatch naming the key that held it.
pub(crate) fn select(root: &Mapping, fragment: &str) -> Result<Value, Error> {
    let not_found = || Error::FragmentNotFound {
        fragment: fragment.to_string(),
    };

    let mut segments = fragment.split('/');
    let first = segments.next().unwrap_or_default();
    let mut key = first;
    let mut current = root.get(first).ok_or_else(not_found)?;

    for segment in segments {
        current = match current {
            Value::Mapping(map) => map.get(segment).ok_or_else(not_found)?,
            Value::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(|idx| items.get(idx))
                .ok_or_else(not_found)?,
            scalar => {
                return Err(Error::DepthMismatch {
                    key: key.to_string(),
                    fragment: fragment.to_string(),
                    found: scalar.type_name(),
                })
            }
        };
        key = segment;
    }

    Ok(current.clone())
}
