//! Counter naming: leaf-path extraction and relative scheme derivation.
//!
//! The sampler reports machine-qualified counter identifiers
//! (`\\Host\Object(Instance)\Counter`). Configuration is keyed by the
//! host-independent form (`\Object(Instance)\Counter`), and emitted metric
//! names are dot-separated Graphite paths derived from it.

/// Path separator in counter identifiers.
pub const PATH_SEPARATOR: char = '\\';

/// Characters replaced with `_` when deriving a relative scheme.
const UNDERSCORE_SET: [char; 6] = ['{', '}', '(', ')', '-', ' '];

/// Extracts the counter's leaf path: the portion after the third separator
/// of a machine-qualified identifier.
///
/// `\\WEB01\Memory\Available MBytes` → `Memory\Available MBytes`. Returns
/// `None` for identifiers with fewer than four separated segments.
pub fn leaf_path(raw: &str) -> Option<&str> {
    raw.splitn(4, PATH_SEPARATOR).nth(3)
}

/// The configuration lookup key for a leaf path: the leaf re-prefixed with
/// its separator.
pub fn lookup_key(leaf: &str) -> String {
    format!("{PATH_SEPARATOR}{leaf}")
}

/// Derives the relative scheme for a counter without a configured override:
/// `{ } ( ) -` and space become `_`, separators become `.`.
pub fn derive_relative(leaf: &str) -> String {
    leaf.chars()
        .map(|c| {
            if c == PATH_SEPARATOR {
                '.'
            } else if UNDERSCORE_SET.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Composes the emitted metric name from the global prefix and the relative
/// scheme.
pub fn metric_name(prefix: &str, relative: &str) -> String {
    format!("{prefix}.{relative}")
}
