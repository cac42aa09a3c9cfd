use serde_json::{Map, Value, json};

/// Label used when the documents themselves are not both objects
pub const ROOT_LABEL: &str = "(root)";

/// What happened to one key
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    Added(Value),
    Removed(Value),
    Modified { before: Value, after: Value },
    Nested(Delta),
}

/// Changes between two documents, in key order (left keys first, then right-only keys)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Delta {
    entries: Vec<(String, Change)>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of top-level entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Change)> {
        self.entries.iter().map(|(key, change)| (key.as_str(), change))
    }

    /// Number of leaf changes at any depth
    pub fn change_count(&self) -> usize {
        self.entries
            .iter()
            .map(|(_, change)| match change {
                Change::Nested(inner) => inner.change_count(),
                _ => 1,
            })
            .sum()
    }

    /// Tuple encoding: `[after]` added, `[before, after]` modified, `[before, 0, 0]`
    /// removed, nested objects for recursion
    pub fn to_json(&self) -> Value {
        if let [(key, change)] = self.entries.as_slice()
            && key == ROOT_LABEL
        {
            return change_to_json(change);
        }

        let map: Map<String, Value> =
            self.entries.iter().map(|(key, change)| (key.clone(), change_to_json(change))).collect();
        Value::Object(map)
    }
}

fn change_to_json(change: &Change) -> Value {
    match change {
        Change::Added(after) => json!([after]),
        Change::Removed(before) => json!([before, 0, 0]),
        Change::Modified { before, after } => json!([before, after]),
        Change::Nested(inner) => inner.to_json(),
    }
}

/// Compute the delta that turns `before` into `after`
pub fn diff_documents(before: &Value, after: &Value) -> Delta {
    match (before, after) {
        (Value::Object(left), Value::Object(right)) => diff_objects(left, right),
        _ if before == after => Delta::default(),
        _ => Delta {
            entries: vec![(
                ROOT_LABEL.to_string(),
                Change::Modified { before: before.clone(), after: after.clone() },
            )],
        },
    }
}

fn diff_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> Delta {
    let mut entries = Vec::new();

    for (key, before) in left {
        match right.get(key) {
            None => entries.push((key.clone(), Change::Removed(before.clone()))),
            Some(after) if after == before => {}
            Some(after) => {
                let change = match (before, after) {
                    (Value::Object(l), Value::Object(r)) => Change::Nested(diff_objects(l, r)),
                    _ => Change::Modified { before: before.clone(), after: after.clone() },
                };
                entries.push((key.clone(), change));
            }
        }
    }

    for (key, after) in right {
        if !left.contains_key(key) {
            entries.push((key.clone(), Change::Added(after.clone())));
        }
    }

    Delta { entries }
}
