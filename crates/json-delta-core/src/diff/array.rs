//! Array diff via the Myers shortest edit script.
//!
//! The two arrays are first trimmed of their common prefix and suffix; only
//! the remaining middles enter the edit-distance search. The classical
//! forward search records a snapshot of the frontier per round, the path is
//! reconstructed backwards from the snapshots, and the script is emitted in
//! the indexed wire form: insertions keyed by post-patch index, deletions by
//! pre-patch index with an underscore prefix. A post-pass fuses a paired
//! insert+delete of objects at the same slot into a nested object diff.

use serde_json::{Map, Value};

use json_delta_util::json_equal::value_equal;

use crate::arena::Arena;
use crate::error::Error;
use crate::options::DiffOptions;
use crate::wire::{self, Shape, ARRAY_MARKER, ARRAY_MARKER_VALUE};

use super::diff_values;

#[derive(Debug, Clone, Copy)]
enum Seg {
    Equal(usize),
    Insert,
    Delete,
}

pub(crate) fn diff_arrays(
    left: &[Value],
    right: &[Value],
    opts: &DiffOptions,
) -> Result<Option<Value>, Error> {
    let strict = opts.strict_equality;
    let n = left.len();
    let m = right.len();

    // Trim the common prefix and suffix under the active equality mode.
    let mut prefix = 0;
    while prefix < n && prefix < m && value_equal(&left[prefix], &right[prefix], strict) {
        prefix += 1;
    }
    let mut suffix = 0;
    while suffix < n - prefix
        && suffix < m - prefix
        && value_equal(&left[n - 1 - suffix], &right[m - 1 - suffix], strict)
    {
        suffix += 1;
    }

    let left_mid = &left[prefix..n - suffix];
    let right_mid = &right[prefix..m - suffix];

    let mut entries = Map::new();
    if left_mid.is_empty() && right_mid.is_empty() {
        return Ok(None);
    } else if left_mid.is_empty() {
        for (i, item) in right_mid.iter().enumerate() {
            entries.insert((prefix + i).to_string(), wire::addition(item));
        }
    } else if right_mid.is_empty() {
        for (i, item) in left_mid.iter().enumerate() {
            entries.insert(format!("_{}", prefix + i), wire::deletion(item));
        }
    } else {
        let script = shortest_edit_script(left_mid, right_mid, strict, opts.arena)?;
        emit(&script, left_mid, right_mid, prefix, &mut entries);
    }

    fuse_object_pairs(&mut entries, opts)?;

    if entries.is_empty() {
        return Ok(None);
    }
    entries.insert(
        ARRAY_MARKER.to_string(),
        Value::String(ARRAY_MARKER_VALUE.to_string()),
    );
    Ok(Some(Value::Object(entries)))
}

/// Frontier snapshots, one row per search round. Rows live in the bound
/// arena when one is supplied and on the heap otherwise.
enum Trace<'a> {
    Heap(Vec<Vec<i64>>),
    Arena { arena: &'a Arena, rows: Vec<usize> },
}

impl<'a> Trace<'a> {
    fn new(arena: Option<&'a Arena>) -> Self {
        match arena {
            Some(arena) => Trace::Arena {
                arena,
                rows: Vec::new(),
            },
            None => Trace::Heap(Vec::new()),
        }
    }

    fn push(&mut self, frontier: &[i64]) -> Result<(), Error> {
        match self {
            Trace::Heap(rows) => rows.push(frontier.to_vec()),
            Trace::Arena { arena, rows } => {
                let row = arena.allocate_words(frontier.len())?;
                arena.store_words(row, frontier);
                rows.push(row);
            }
        }
        Ok(())
    }

    fn get(&self, row: usize, index: usize) -> i64 {
        match self {
            Trace::Heap(rows) => rows[row][index],
            Trace::Arena { arena, rows } => arena.load_word(rows[row], index),
        }
    }
}

/// Runs the forward search over the trimmed middles and reconstructs the
/// minimal script as a flat segment list.
fn shortest_edit_script(
    left: &[Value],
    right: &[Value],
    strict: bool,
    arena: Option<&Arena>,
) -> Result<Vec<Seg>, Error> {
    let n = left.len() as i64;
    let m = right.len() as i64;
    let max = n + m;
    let offset = max;
    let vlen = (2 * max + 1) as usize;
    let at = |k: i64| (k + offset) as usize;

    let mut frontier = vec![0i64; vlen];
    let mut trace = Trace::new(arena);

    let found = 'search: {
        for d in 0..=max {
            trace.push(&frontier)?;
            let mut k = -d;
            while k <= d {
                // Step down (insertion) from the neighbouring diagonal when
                // it reaches further, otherwise step right (deletion).
                let mut x = if k == -d || (k != d && frontier[at(k - 1)] < frontier[at(k + 1)]) {
                    frontier[at(k + 1)]
                } else {
                    frontier[at(k - 1)] + 1
                };
                let mut y = x - k;
                while x < n && y < m && value_equal(&left[x as usize], &right[y as usize], strict)
                {
                    x += 1;
                    y += 1;
                }
                frontier[at(k)] = x;
                if x >= n && y >= m {
                    break 'search d;
                }
                k += 2;
            }
        }
        max
    };

    // Walk the snapshots backwards, reconstructing the path one edit (plus
    // its trailing snake) per round.
    let mut script = Vec::new();
    let mut x = n;
    let mut y = m;
    for d in (1..=found).rev() {
        let k = x - y;
        let row = d as usize;
        let prev_k = if k == -d || (k != d && trace.get(row, at(k - 1)) < trace.get(row, at(k + 1)))
        {
            k + 1
        } else {
            k - 1
        };
        let x_prev = trace.get(row, at(prev_k));
        let y_prev = x_prev - prev_k;
        let (step, x_mid) = if prev_k == k + 1 {
            (Seg::Insert, x_prev)
        } else {
            (Seg::Delete, x_prev + 1)
        };
        let snake = (x - x_mid) as usize;
        if snake > 0 {
            script.push(Seg::Equal(snake));
        }
        script.push(step);
        x = x_prev;
        y = y_prev;
    }
    if x > 0 {
        script.push(Seg::Equal(x as usize));
    }
    script.reverse();
    Ok(script)
}

/// Emits the script in the indexed wire form, tracking the post-patch index
/// for insertions and the pre-patch index for deletions.
fn emit(
    script: &[Seg],
    left_mid: &[Value],
    right_mid: &[Value],
    prefix: usize,
    entries: &mut Map<String, Value>,
) {
    let mut count = prefix;
    let mut deleted_count = prefix;
    let mut ia = 0;
    let mut ib = 0;

    for seg in script.iter().copied() {
        match seg {
            Seg::Equal(len) => {
                ia += len;
                ib += len;
                count += len;
                deleted_count += len;
            }
            Seg::Delete => {
                entries.insert(format!("_{deleted_count}"), wire::deletion(&left_mid[ia]));
                ia += 1;
                deleted_count += 1;
            }
            Seg::Insert => {
                entries.insert(count.to_string(), wire::addition(&right_mid[ib]));
                ib += 1;
                count += 1;
            }
        }
    }
}

/// Rewrites a paired insertion and deletion of objects at the same slot into
/// a nested object diff, matching the jsondiffpatch convention for arrays of
/// objects. An empty nested diff drops both entries.
fn fuse_object_pairs(entries: &mut Map<String, Value>, opts: &DiffOptions) -> Result<(), Error> {
    let mut slots = Vec::new();
    for (key, value) in entries.iter() {
        if key.starts_with('_') {
            continue;
        }
        let Ok(slot) = key.parse::<usize>() else {
            continue;
        };
        if let Some(Shape::Addition { new }) = wire::shape(value) {
            if new.is_object() {
                slots.push(slot);
            }
        }
    }

    for slot in slots {
        let add_key = slot.to_string();
        let del_key = format!("_{slot}");
        let nested = {
            let (Some(add), Some(del)) = (entries.get(&add_key), entries.get(&del_key)) else {
                continue;
            };
            let Some(Shape::Addition { new }) = wire::shape(add) else {
                continue;
            };
            let Some(Shape::Deletion { old }) = wire::shape(del) else {
                continue;
            };
            if !new.is_object() || !old.is_object() {
                continue;
            }
            diff_values(old, new, opts)?
        };
        entries.shift_remove(&del_key);
        entries.shift_remove(&add_key);
        if let Some(nested) = nested {
            entries.insert(add_key, nested);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diff(left: &Value, right: &Value) -> Option<Value> {
        diff_values(left, right, &DiffOptions::default()).unwrap()
    }

    #[test]
    fn test_equal_arrays_collapse() {
        assert_eq!(diff(&json!([]), &json!([])), None);
        assert_eq!(diff(&json!([1, 2, 3]), &json!([1, 2, 3])), None);
    }

    #[test]
    fn test_tail_element_change() {
        assert_eq!(
            diff(&json!([1, 2, 3]), &json!([1, 2, 4])),
            Some(json!({"2": [4], "_2": [3, 0, 0], "_t": "a"}))
        );
    }

    #[test]
    fn test_head_removal() {
        assert_eq!(
            diff(&json!([1, 2, 3]), &json!([2, 3])),
            Some(json!({"_0": [1, 0, 0], "_t": "a"}))
        );
    }

    #[test]
    fn test_pure_middle_insertion() {
        assert_eq!(
            diff(&json!([1, 3]), &json!([1, 2, 3])),
            Some(json!({"1": [2], "_t": "a"}))
        );
    }

    #[test]
    fn test_pure_append() {
        assert_eq!(
            diff(&json!([1, 2]), &json!([1, 2, 3, 4])),
            Some(json!({"2": [3], "3": [4], "_t": "a"}))
        );
    }

    #[test]
    fn test_clear_all() {
        assert_eq!(
            diff(&json!([1, 2]), &json!([])),
            Some(json!({"_0": [1, 0, 0], "_1": [2, 0, 0], "_t": "a"}))
        );
    }

    #[test]
    fn test_scalar_replacement_emits_paired_entries() {
        assert_eq!(
            diff(&json!([1]), &json!([{"1": 2}])),
            Some(json!({"0": [{"1": 2}], "_0": [1, 0, 0], "_t": "a"}))
        );
    }

    #[test]
    fn test_mixed_delete_and_replace() {
        assert_eq!(
            diff(&json!([1, {"1": 1}]), &json!([{"1": 2}])),
            Some(json!({
                "0": [{"1": 2}],
                "_0": [1, 0, 0],
                "_1": [{"1": 1}, 0, 0],
                "_t": "a"
            }))
        );
    }

    #[test]
    fn test_object_pair_fuses_into_nested_diff() {
        assert_eq!(
            diff(&json!([{"1": 1}]), &json!([{"1": 2}])),
            Some(json!({"0": {"1": [1, 2]}, "_t": "a"}))
        );
    }

    #[test]
    fn test_fusion_respects_surrounding_context() {
        assert_eq!(
            diff(
                &json!(["keep", {"a": 1, "b": 2}, "tail"]),
                &json!(["keep", {"a": 1, "b": 3}, "tail"])
            ),
            Some(json!({"1": {"b": [2, 3]}, "_t": "a"}))
        );
    }

    #[test]
    fn test_shift_produces_minimal_script() {
        // One deletion, not a rewrite of every slot.
        assert_eq!(
            diff(&json!(["a", "b", "c", "d"]), &json!(["b", "c", "d"])),
            Some(json!({"_0": ["a", 0, 0], "_t": "a"}))
        );
    }

    #[test]
    fn test_rotation() {
        let out = diff(&json!(["x", "y", "z"]), &json!(["y", "z", "x"])).unwrap();
        assert_eq!(
            out,
            json!({"2": ["x"], "_0": ["x", 0, 0], "_t": "a"})
        );
    }

    #[test]
    fn test_tolerant_trim_spans_number_drift() {
        let opts = DiffOptions::tolerant();
        let out = diff_values(
            &json!([1.0, 2.0, 3.0]),
            &json!([1.0 + 1e-12, 2.0, 9.0]),
            &opts,
        )
        .unwrap();
        assert_eq!(out, Some(json!({"2": [9.0], "_2": [3.0, 0, 0], "_t": "a"})));
    }

    #[test]
    fn test_arena_backed_search_matches_heap() {
        let arena = Arena::new(1024);
        let opts = DiffOptions::default().with_arena(&arena);
        let left = json!([1, 2, 3, 4, 5, 6]);
        let right = json!([6, 5, 4, 3, 2, 1]);
        let with_arena = diff_values(&left, &right, &opts).unwrap();
        let without = diff_values(&left, &right, &DiffOptions::default()).unwrap();
        assert_eq!(with_arena, without);
        assert!(arena.used() > 0);
    }

    #[test]
    fn test_tiny_arena_cap_surfaces_out_of_memory() {
        let arena = Arena::with_max_capacity(8, 64);
        let opts = DiffOptions::default().with_arena(&arena);
        let left: Value = json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        let right: Value = json!([10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
        let result = diff_values(&left, &right, &opts);
        assert!(matches!(result, Err(Error::OutOfMemory)));
    }
}
