//! json-delta-core - structural JSON diff and patch in the `jsondiffpatch`
//! wire format.
//!
//! The engine is a pure tree transformer over [`serde_json::Value`]: it
//! never mutates its inputs, and both diff and patch outputs are freshly
//! owned trees. A diff is itself a JSON value whose shapes are decided by
//! position and arity:
//!
//! - `[old, new]` replaces the value at this position;
//! - `[new]` inserts a value;
//! - `[old, 0, 0]` deletes a value;
//! - an object maps affected keys to further diff entries;
//! - an object with `"_t": "a"` is an array diff, keyed by post-patch index
//!   for insertions and by underscore-prefixed pre-patch index for
//!   deletions; `["", dest, 3]` entries move elements on patch.
//!
//! Array diffs are computed with the Myers shortest edit script after
//! trimming the common prefix and suffix, and paired insert+delete of
//! objects at one slot fuse into a nested object diff.
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use json_delta_core::{diff, patch, DiffOptions};
//!
//! let left = json!({"name": "fred", "tags": [1, 2, 3]});
//! let right = json!({"name": "fred", "tags": [1, 2, 4]});
//!
//! let delta = diff(&left, &right, &DiffOptions::default())
//!     .unwrap()
//!     .expect("values differ");
//! assert_eq!(delta, json!({"tags": {"2": [4], "_2": [3, 0, 0], "_t": "a"}}));
//! assert_eq!(patch(&left, &delta).unwrap(), right);
//! ```

pub mod arena;
mod depth;
mod diff;
pub mod error;
pub mod options;
mod patch;
pub mod wire;

pub use arena::{Arena, MAX_ARENA_SIZE};
pub use depth::MAX_DEPTH;
pub use error::Error;
pub use json_delta_util::json_equal::{deep_equal, value_equal};
pub use options::DiffOptions;

use serde_json::Value;

/// Maximum accepted JSON text length for [`diff_from_text`], per side.
pub const MAX_INPUT_SIZE: usize = 1024 * 1024;

/// Computes the structural diff between two values.
///
/// Returns `Ok(None)` when the values are equal under the options' equality
/// mode. When an arena is bound through `opts` its cursor is reset first and
/// the call's transient allocations draw from it.
pub fn diff(left: &Value, right: &Value, opts: &DiffOptions) -> Result<Option<Value>, Error> {
    if let Some(arena) = opts.arena {
        arena.reset();
    }
    diff::diff_values(left, right, opts)
}

/// Applies a diff to a value, returning the reconstructed document.
///
/// The result is fully owned and remains usable after both inputs are gone.
pub fn patch(original: &Value, diff: &Value) -> Result<Value, Error> {
    patch::apply(original, diff)
}

/// Parses two JSON texts and diffs the resulting documents in one call.
///
/// Either input longer than [`MAX_INPUT_SIZE`] bytes is rejected with
/// [`Error::InputTooLarge`] before any parsing happens.
pub fn diff_from_text(
    left_text: &str,
    right_text: &str,
    opts: &DiffOptions,
) -> Result<Option<Value>, Error> {
    if left_text.len() > MAX_INPUT_SIZE || right_text.len() > MAX_INPUT_SIZE {
        return Err(Error::InputTooLarge);
    }
    let left: Value = serde_json::from_str(left_text)?;
    let right: Value = serde_json::from_str(right_text)?;
    diff(&left, &right, opts)
}
