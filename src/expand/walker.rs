use tracing::trace;

use crate::document::{Mapping, Value};

/// Rewrites every string leaf of `doc` through `lookup`, preserving its shape.
///
/// `lookup` may return any value, so a single string leaf can expand into a
/// whole sub-document. Mapping keys are run through `lookup` as well: when a
/// key resolves to a mapping (directly, or as a string that parses as one),
/// that mapping's entries are spliced into the parent and the original entry
/// is dropped. Spliced entries overwrite sibling keys of the same name, and a
/// later splice overwrites an earlier one. Other keys are kept as written.
///
/// The first error from `lookup` aborts the walk.
pub fn rewrite<F, E>(doc: Value, lookup: &mut F) -> Result<Value, E>
where
    F: FnMut(&str) -> Result<Value, E>,
{
    match doc {
        Value::String(s) => lookup(&s),
        Value::Sequence(items) => {
            let mut rewritten = Vec::with_capacity(items.len());
            for item in items {
                rewritten.push(rewrite(item, lookup)?);
            }
            Ok(Value::Sequence(rewritten))
        }
        Value::Mapping(map) => rewrite_mapping(map, lookup).map(Value::Mapping),
        scalar => Ok(scalar),
    }
}

fn rewrite_mapping<F, E>(map: Mapping, lookup: &mut F) -> Result<Mapping, E>
where
    F: FnMut(&str) -> Result<Value, E>,
{
    let mut rewritten = Mapping::with_capacity(map.len());
    let mut splices = Vec::new();

    for (key, value) in map {
        if let Some(entries) = splice_entries(&key, lookup)? {
            trace!(key = %key, entries = entries.len(), "splicing resolved key into parent mapping");
            splices.push(entries);
            continue;
        }
        let value = rewrite(value, lookup)?;
        rewritten.insert(key, value);
    }

    for entries in splices {
        rewritten.extend(entries);
    }
    Ok(rewritten)
}

fn splice_entries<F, E>(key: &str, lookup: &mut F) -> Result<Option<Mapping>, E>
where
    F: FnMut(&str) -> Result<Value, E>,
{
    let entries = match lookup(key)? {
        Value::Mapping(map) => Some(map),
        Value::String(resolved) if resolved != key => Value::from_yaml_str(&resolved)
            .ok()
            .and_then(|parsed| parsed.into_mapping().ok()),
        _ => None,
    };
    Ok(entries)
}
