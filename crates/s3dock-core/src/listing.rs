//! Prefix/marker/delimiter/max-keys pagination over a bucket's keys.
//!
//! The store hands this module the full key set; pagination itself is a pure
//! function so it can be exercised without touching a filesystem. Keys and
//! common prefixes both count toward `max_keys`, and the marker filter
//! applies to the key itself even when the key would fold into a common
//! prefix.

use std::collections::HashSet;

/// Default and maximum number of entries in a single listing response.
pub const MAX_KEYS_CEILING: usize = 1000;

/// Parameters of one listing request.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    /// Only keys starting with this prefix participate.
    pub prefix: String,
    /// Keys lexicographically at or before this value are skipped.
    pub marker: String,
    /// Optional grouping delimiter.
    pub delimiter: Option<String>,
    /// Requested page size, clamped to [`MAX_KEYS_CEILING`].
    pub max_keys: usize,
}

impl ListQuery {
    /// Build a query, applying the default and ceiling for `max_keys`.
    #[must_use]
    pub fn new(
        prefix: Option<&str>,
        marker: Option<&str>,
        delimiter: Option<&str>,
        max_keys: Option<usize>,
    ) -> Self {
        Self {
            prefix: prefix.unwrap_or("").to_owned(),
            marker: marker.unwrap_or("").to_owned(),
            delimiter: delimiter.filter(|d| !d.is_empty()).map(ToOwned::to_owned),
            max_keys: max_keys.unwrap_or(MAX_KEYS_CEILING).min(MAX_KEYS_CEILING),
        }
    }
}

/// The paginated outcome: selected keys, grouped prefixes, truncation state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOutcome {
    /// Keys that belong in `Contents`, ascending.
    pub keys: Vec<String>,
    /// Unique common prefixes, in first-occurrence (therefore ascending)
    /// order, each ending with the delimiter.
    pub common_prefixes: Vec<String>,
    /// Whether the page was cut short by `max_keys`.
    pub is_truncated: bool,
    /// The last emitted key or common prefix, present only when truncated.
    pub next_marker: Option<String>,
}

/// Paginate a bucket's keys.
///
/// `keys` need not be sorted; a sorted working copy is taken. The returned
/// page walks keys in ascending code-point order, skipping keys at or
/// before the marker and outside the prefix, folding delimited keys into
/// common prefixes, and stopping after `max_keys` combined entries.
#[must_use]
pub fn paginate(keys: &[String], query: &ListQuery) -> ListOutcome {
    let mut sorted: Vec<&String> = keys.iter().collect();
    sorted.sort_unstable();

    let mut outcome = ListOutcome::default();
    let mut seen_prefixes: HashSet<String> = HashSet::new();
    let mut emitted = 0_usize;
    let mut last_emitted: Option<String> = None;

    for key in sorted {
        if !query.prefix.is_empty() && !key.starts_with(&query.prefix) {
            continue;
        }
        if !query.marker.is_empty() && key.as_str() <= query.marker.as_str() {
            continue;
        }

        // A key folding into an already-emitted common prefix adds nothing.
        let grouped = query.delimiter.as_deref().and_then(|delimiter| {
            let remainder = &key[query.prefix.len()..];
            remainder.find(delimiter).map(|pos| {
                format!(
                    "{}{}{}",
                    query.prefix,
                    &remainder[..pos],
                    delimiter
                )
            })
        });

        if let Some(common_prefix) = grouped {
            if seen_prefixes.contains(&common_prefix) {
                continue;
            }
            if emitted >= query.max_keys {
                outcome.is_truncated = true;
                break;
            }
            seen_prefixes.insert(common_prefix.clone());
            last_emitted = Some(common_prefix.clone());
            outcome.common_prefixes.push(common_prefix);
            emitted += 1;
            continue;
        }

        if emitted >= query.max_keys {
            outcome.is_truncated = true;
            break;
        }
        last_emitted = Some(key.clone());
        outcome.keys.push(key.clone());
        emitted += 1;
    }

    if outcome.is_truncated {
        outcome.next_marker = last_emitted;
    }
    outcome
}
