use serde_json::{Map, Value};

use crate::fuzzer::Fuzzer;

const STRING_ALPHABET: &str = "abcdefghij XYZ_-0123456789é☃";

/// Odds for each node type when generating random JSON.
#[derive(Debug, Clone)]
pub struct NodeOdds {
    pub null: u32,
    pub boolean: u32,
    pub number: u32,
    pub string: u32,
    pub array: u32,
    pub object: u32,
}

impl Default for NodeOdds {
    fn default() -> Self {
        Self {
            null: 1,
            boolean: 2,
            number: 10,
            string: 8,
            array: 3,
            object: 3,
        }
    }
}

impl NodeOdds {
    fn total(&self) -> u32 {
        self.null + self.boolean + self.number + self.string + self.array + self.object
    }
}

/// Options for random JSON generation.
#[derive(Debug, Clone)]
pub struct RandomJsonOptions {
    pub odds: NodeOdds,
    /// Containers are not generated below this depth.
    pub max_depth: usize,
    /// Maximum number of children per generated container.
    pub max_width: usize,
}

impl Default for RandomJsonOptions {
    fn default() -> Self {
        Self {
            odds: NodeOdds::default(),
            max_depth: 4,
            max_width: 6,
        }
    }
}

/// Seeded random JSON document generator.
///
/// # Examples
///
/// ```
/// use json_delta_util::json_random::RandomJson;
///
/// let gen = RandomJson::with_seed(42);
/// let doc = gen.generate();
/// assert!(doc.is_object() || doc.is_array());
/// ```
pub struct RandomJson {
    fuzzer: Fuzzer,
    opts: RandomJsonOptions,
}

impl RandomJson {
    pub fn new(fuzzer: Fuzzer, opts: RandomJsonOptions) -> Self {
        Self { fuzzer, opts }
    }

    /// Generator with default options from a small integer seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(Fuzzer::from_seed(seed), RandomJsonOptions::default())
    }

    /// Generate a random document rooted at a container.
    pub fn generate(&self) -> Value {
        if self.fuzzer.random_bool(0.5) {
            self.object(1)
        } else {
            self.array(1)
        }
    }

    /// Returns a structurally perturbed deep copy of `value`.
    ///
    /// Each node is either kept, mutated in place (keys added or removed,
    /// elements inserted or dropped, scalars replaced), or swapped out for a
    /// freshly generated subtree.
    pub fn mutate(&self, value: &Value) -> Value {
        if self.fuzzer.random_bool(0.1) {
            return self.node(1);
        }
        match value {
            Value::Object(entries) => {
                let mut out = Map::new();
                for (key, val) in entries {
                    if self.fuzzer.random_bool(0.1) {
                        continue; // drop the key
                    }
                    if self.fuzzer.random_bool(0.3) {
                        out.insert(key.clone(), self.mutate(val));
                    } else {
                        out.insert(key.clone(), crate::json_clone::clone(val));
                    }
                }
                if self.fuzzer.random_bool(0.3) {
                    out.insert(self.key(), self.node(1));
                }
                Value::Object(out)
            }
            Value::Array(items) => {
                let mut out = Vec::new();
                for item in items {
                    if self.fuzzer.random_bool(0.1) {
                        continue; // drop the element
                    }
                    if self.fuzzer.random_bool(0.15) {
                        out.push(self.node(1)); // insert before it
                    }
                    if self.fuzzer.random_bool(0.3) {
                        out.push(self.mutate(item));
                    } else {
                        out.push(crate::json_clone::clone(item));
                    }
                }
                Value::Array(out)
            }
            _ => {
                if self.fuzzer.random_bool(0.5) {
                    self.scalar()
                } else {
                    crate::json_clone::clone(value)
                }
            }
        }
    }

    fn node(&self, depth: usize) -> Value {
        let odds = &self.opts.odds;
        let containers_allowed = depth < self.opts.max_depth;
        let total = if containers_allowed {
            odds.total()
        } else {
            odds.total() - odds.array - odds.object
        };
        let mut roll = self.fuzzer.random_int(0, i64::from(total) - 1) as u32;

        for (weight, kind) in [
            (odds.null, NodeKind::Null),
            (odds.boolean, NodeKind::Boolean),
            (odds.number, NodeKind::Number),
            (odds.string, NodeKind::String),
        ] {
            if roll < weight {
                return self.leaf(kind);
            }
            roll -= weight;
        }
        if roll < odds.array {
            self.array(depth + 1)
        } else {
            self.object(depth + 1)
        }
    }

    fn leaf(&self, kind: NodeKind) -> Value {
        match kind {
            NodeKind::Null => Value::Null,
            NodeKind::Boolean => Value::Bool(self.fuzzer.random_bool(0.5)),
            NodeKind::Number => self.number(),
            NodeKind::String => {
                let len = self.fuzzer.random_int(0, 12) as usize;
                Value::String(self.fuzzer.random_string(len, STRING_ALPHABET))
            }
        }
    }

    fn scalar(&self) -> Value {
        match self.fuzzer.random_int(0, 3) {
            0 => self.leaf(NodeKind::Null),
            1 => self.leaf(NodeKind::Boolean),
            2 => self.leaf(NodeKind::Number),
            _ => self.leaf(NodeKind::String),
        }
    }

    fn number(&self) -> Value {
        if self.fuzzer.random_bool(0.5) {
            Value::from(self.fuzzer.random_int(-100_000, 100_000))
        } else {
            Value::from(self.fuzzer.random() * 2_000.0 - 1_000.0)
        }
    }

    fn array(&self, depth: usize) -> Value {
        let len = self.fuzzer.random_int(0, self.opts.max_width as i64) as usize;
        Value::Array((0..len).map(|_| self.node(depth)).collect())
    }

    fn object(&self, depth: usize) -> Value {
        let len = self.fuzzer.random_int(0, self.opts.max_width as i64) as usize;
        let mut out = Map::new();
        for _ in 0..len {
            out.insert(self.key(), self.node(depth));
        }
        Value::Object(out)
    }

    fn key(&self) -> String {
        let len = self.fuzzer.random_int(1, 8) as usize;
        self.fuzzer.random_string(len, "abcdefgh_123")
    }
}

#[derive(Clone, Copy)]
enum NodeKind {
    Null,
    Boolean,
    Number,
    String,
}
