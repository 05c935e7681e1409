//! Deep merge of documents.
//!
//! Sources are folded into the target left to right. Keys missing from the
//! target are copied in, keys holding the same container kind on both sides
//! are merged recursively, and anything else is overwritten by the source.

use super::node::Document;
use crate::error::{Error, Result};
use tracing::debug;

/// Merges `source` into `target`.
///
/// A null target takes the shape of the source. Merging a sequence into a
/// map (or a map into a sequence) is a `TypeMismatch`, as is merging into a
/// scalar. Scalar and null sources leave the target untouched.
///
/// # Example
///
/// ```
/// use nestpath::document::codec::parse_json;
/// use nestpath::document::merge::merge;
///
/// let mut target = parse_json(r#"{"a": {"x": 1}, "b": 2}"#).unwrap();
/// merge(&mut target, parse_json(r#"{"a": {"y": 2}, "b": 3}"#).unwrap()).unwrap();
/// assert_eq!(target, parse_json(r#"{"a": {"x": 1, "y": 2}, "b": 3}"#).unwrap());
/// ```
pub fn merge(target: &mut Document, source: Document) -> Result<()> {
    if !source.is_container() {
        debug!(kind = source.kind_name(), "skipping non-container merge source");
        return Ok(());
    }
    if target.is_null() {
        *target = match source {
            Document::Sequence(_) => Document::sequence(),
            _ => Document::map(),
        };
    }

    match (target, source) {
        (Document::Map(map), Document::Map(fields)) => {
            for (key, value) in fields {
                match map.get_mut(&key) {
                    Some(existing) => merge_value(existing, value)?,
                    None => {
                        map.insert(key, value);
                    }
                }
            }
            Ok(())
        }
        (Document::Sequence(items), Document::Sequence(values)) => {
            for (index, value) in values.into_iter().enumerate() {
                match items.get_mut(index) {
                    Some(existing) => merge_value(existing, value)?,
                    None => items.push(value),
                }
            }
            Ok(())
        }
        (target, source) => {
            debug!(
                target = target.kind_name(),
                source = source.kind_name(),
                "refusing to merge mismatched containers"
            );
            Err(Error::type_mismatch(target.kind_name(), source.kind_name()))
        }
    }
}

/// Merges each source into `target` in order.
pub fn merge_all<I>(target: &mut Document, sources: I) -> Result<()>
where
    I: IntoIterator<Item = Document>,
{
    for source in sources {
        merge(target, source)?;
    }
    Ok(())
}

fn merge_value(existing: &mut Document, value: Document) -> Result<()> {
    let same_kind = matches!(
        (&*existing, &value),
        (Document::Map(_), Document::Map(_)) | (Document::Sequence(_), Document::Sequence(_))
    );
    if same_kind {
        merge(existing, value)
    } else {
        *existing = value;
        Ok(())
    }
}
