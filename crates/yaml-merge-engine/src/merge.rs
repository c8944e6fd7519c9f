//! Merge logic
//!
//! Folds a source mapping into a destination mapping in place:
//! - Mappings: deep-merge by key (recursive)
//! - Sequences: APPEND (no element-wise merge, duplicates kept)
//! - Scalars: override (source wins, null included)
//!
//! When the source holds a mapping or sequence at a key where the
//! destination holds a value of another type, the destination value is
//! discarded and replaced by a fresh empty container before merging.
//! A scalar can therefore be silently lost to a later mapping or sequence.

use crate::filter::KeyFilter;
use crate::node::{Mapping, Node};

/// Merge `source` into `destination`, returning the destination.
///
/// `source` is never modified. When `filter` is given it is checked for
/// every key at every nesting level, independently of the ancestors: a
/// rejected scalar or sequence key is dropped, while a rejected mapping key
/// is still searched and appears in the destination only when some
/// descendant key passes.
pub fn merge<'a>(
    source: &Mapping,
    destination: &'a mut Mapping,
    filter: Option<&KeyFilter>,
) -> &'a mut Mapping {
    for (key, value) in source {
        let kept = filter.map_or(true, |f| f.keep(key));

        match value {
            Node::Mapping(child) if kept => merge_child(destination, key, child, filter),
            Node::Mapping(child) => {
                let mut survivors = Mapping::new();
                merge(child, &mut survivors, filter);
                if !survivors.is_empty() {
                    merge_child(destination, key, &survivors, None);
                }
            }
            _ if !kept => {}
            Node::Sequence(items) => {
                let slot = destination.entry(key.clone()).or_insert_with(Node::sequence);
                if let Node::Sequence(existing) = slot {
                    existing.extend(items.iter().cloned());
                } else {
                    *slot = Node::Sequence(items.clone());
                }
            }
            Node::Scalar(_) => {
                destination.insert(key.clone(), value.clone());
            }
        }
    }
    destination
}

/// Merge `child` into the mapping at `destination[key]`, replacing any
/// non-mapping value found there
fn merge_child(
    destination: &mut Mapping,
    key: &str,
    child: &Mapping,
    filter: Option<&KeyFilter>,
) {
    let slot = destination.entry(key.to_string()).or_insert_with(Node::mapping);
    if let Node::Mapping(existing) = slot {
        merge(child, existing, filter);
    } else {
        let mut fresh = Mapping::new();
        merge(child, &mut fresh, filter);
        *slot = Node::Mapping(fresh);
    }
}

/// Merge several sources in order (last has highest precedence for scalars)
pub fn merge_all<'s, 'a, I>(
    sources: I,
    destination: &'a mut Mapping,
    filter: Option<&KeyFilter>,
) -> &'a mut Mapping
where
    I: IntoIterator<Item = &'s Mapping>,
{
    for source in sources {
        merge(source, destination, filter);
    }
    destination
}
