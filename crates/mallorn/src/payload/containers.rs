//! Payload implementations for arrays and maps of values

use indexmap::IndexMap;

use super::{hash_of, Payload};
use crate::error::Result;
use crate::value::Value;

/// Give `value` a private copy of its payload and recurse into it.
///
/// Single values keep their identity and stay shared.
fn detach_element(value: &mut Value) -> Result<()> {
    if value.is_single() {
        return Ok(());
    }
    value.clone_slot()?;
    value.detach()
}

impl Payload for Vec<Value> {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn render(&self) -> String {
        let items: Vec<String> = self.iter().map(Value::to_string).collect();
        format!("[{}]", items.join(", "))
    }

    fn hash_code(&self) -> u64 {
        hash_of(self)
    }

    fn detach(&mut self) -> Result<()> {
        self.iter_mut().try_for_each(detach_element)
    }

    fn type_name() -> &'static str {
        "array"
    }
}

impl Payload for IndexMap<String, Value> {
    // IndexMap equality ignores insertion order, and so does the hash.
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn render(&self) -> String {
        let entries: Vec<String> = self.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
        format!("{{{}}}", entries.join(", "))
    }

    fn hash_code(&self) -> u64 {
        self.iter()
            .fold(0u64, |acc, entry| acc.wrapping_add(hash_of(&entry)))
    }

    fn detach(&mut self) -> Result<()> {
        self.values_mut().try_for_each(detach_element)
    }

    fn type_name() -> &'static str {
        "map"
    }
}
