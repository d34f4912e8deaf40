//! Patch applier for the diff wire format.
//!
//! Malformed entries inside an otherwise valid diff are tolerated: keys that
//! do not parse as indices, indices past `i32::MAX`, and array values that
//! match no wire shape are skipped rather than failing the patch, so diff
//! authors can embed extensions. The two exceptions are a scalar entry at a
//! numeric index and a nested sub-diff addressing a slot past the end of
//! the array, both of which fail the whole call.

use serde_json::{Map, Value};

use json_delta_util::{json_clone, json_equal::value_equal};

use crate::depth;
use crate::error::Error;
use crate::wire::{self, Shape, ARRAY_MARKER};

pub(crate) fn apply(original: &Value, diff: &Value) -> Result<Value, Error> {
    let _guard = depth::enter_patch()?;

    // A change array at a value position replaces the value outright.
    if let Some(Shape::Change { new, .. }) = wire::shape(diff) {
        return Ok(json_clone::clone(new));
    }
    let Value::Object(entries) = diff else {
        // Nothing recognisable to apply here.
        return Ok(json_clone::clone(original));
    };
    if entries.contains_key(ARRAY_MARKER) {
        return match original {
            Value::Array(items) => apply_to_array(items, entries),
            _ => Ok(json_clone::clone(original)),
        };
    }
    apply_to_object(original, entries)
}

// ── Object patch ─────────────────────────────────────────────────────────

fn apply_to_object(original: &Value, entries: &Map<String, Value>) -> Result<Value, Error> {
    let mut result = match original {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for (key, entry) in entries {
        match entry {
            // At a key position the arity alone decides the operation.
            Value::Array(items) => match items.len() {
                1 => {
                    result.insert(key.clone(), json_clone::clone(&items[0]));
                }
                2 => {
                    result.insert(key.clone(), json_clone::clone(&items[1]));
                }
                3 => {
                    result.shift_remove(key);
                }
                _ => {} // matches no rule; skipped
            },
            _ => {
                let patched = match result.get(key) {
                    Some(child) => Some(apply(child, entry)?),
                    None => None,
                };
                if let Some(patched) = patched {
                    result.insert(key.clone(), patched);
                }
            }
        }
    }

    Ok(Value::Object(result))
}

// ── Array patch ──────────────────────────────────────────────────────────

struct MoveOp {
    src: usize,
    dest: usize,
}

fn apply_to_array(items: &[Value], entries: &Map<String, Value>) -> Result<Value, Error> {
    let mut working: Vec<Value> = items.iter().map(json_clone::clone).collect();

    // Pass 1: classify the diff's keys. An addition single at index `i`
    // suppresses the deletion at `_i`: the pair is a replacement and the
    // slot must not be deleted first.
    let mut replace_indices: Vec<usize> = Vec::new();
    for (key, entry) in entries {
        if key.starts_with('_') || key == ARRAY_MARKER {
            continue;
        }
        let Some(index) = parse_index(key) else {
            continue;
        };
        if matches!(wire::shape(entry), Some(Shape::Addition { .. })) {
            replace_indices.push(index);
        }
    }

    let mut delete_indices: Vec<usize> = Vec::new();
    let mut replaced: Vec<usize> = Vec::new();
    let mut moves: Vec<MoveOp> = Vec::new();
    for (key, entry) in entries {
        let Some(digits) = key.strip_prefix('_') else {
            continue;
        };
        let Some(index) = parse_index(digits) else {
            continue;
        };
        match wire::shape(entry) {
            Some(Shape::Move { dest }) => moves.push(MoveOp { src: index, dest }),
            Some(Shape::Deletion { .. }) => {
                if replace_indices.contains(&index) {
                    replaced.push(index);
                } else {
                    delete_indices.push(index);
                }
            }
            _ => {} // matches no rule; skipped
        }
    }

    // Pass 2: deletions, in descending order so pending indices stay valid.
    delete_indices.sort_unstable_by(|a, b| b.cmp(a));
    for index in delete_indices {
        if index < working.len() {
            working.remove(index);
        }
    }

    // Pass 3: moves, destination ascending. The moved element is located by
    // strict equality against the pre-patch original.
    moves.sort_unstable_by_key(|op| op.dest);
    for op in &moves {
        let Some(source) = items.get(op.src) else {
            continue;
        };
        let Some(position) = working.iter().position(|v| value_equal(v, source, true)) else {
            continue;
        };
        let value = working.remove(position);
        if op.dest >= working.len() {
            working.push(value);
        } else {
            working.insert(op.dest, value);
        }
    }

    // Pass 4: additions, replacements and nested sub-diffs, in ascending
    // index order so earlier insertions shift later slots before those are
    // addressed.
    let mut indexed: Vec<(usize, &Value)> = Vec::new();
    for (key, entry) in entries {
        if key == ARRAY_MARKER || key.starts_with('_') {
            continue;
        }
        let Some(index) = parse_index(key) else {
            continue;
        };
        indexed.push((index, entry));
    }
    indexed.sort_by_key(|(index, _)| *index);

    for (index, entry) in indexed {
        match entry {
            Value::Array(_) => match wire::shape(entry) {
                Some(Shape::Addition { new }) => {
                    let new = json_clone::clone(new);
                    if replaced.contains(&index) {
                        // The suppressed deletion's sibling: replace in place.
                        if index < working.len() {
                            working[index] = new;
                        } else if index == working.len() {
                            working.push(new);
                        }
                        // strictly past the end: the write is dropped
                    } else if index < working.len() {
                        working.insert(index, new);
                    } else if index == working.len() {
                        working.push(new);
                    }
                }
                Some(Shape::Change { new, .. }) => {
                    if index < working.len() {
                        working[index] = json_clone::clone(new);
                    }
                }
                _ => {} // deletion/move triples at a bare index match no rule
            },
            Value::Object(_) => {
                if index >= working.len() {
                    return Err(Error::IndexOutOfRange);
                }
                let patched = apply(&working[index], entry)?;
                working[index] = patched;
            }
            _ => return Err(Error::InvalidDiffShape),
        }
    }

    Ok(Value::Array(working))
}

/// Parses a decimal index key. Indices past `i32::MAX` are treated as
/// unrecognised, like any other malformed key.
fn parse_index(digits: &str) -> Option<usize> {
    let index: usize = digits.parse().ok()?;
    (index <= i32::MAX as usize).then_some(index)
}
