//! Display, Debug, equality and hashing for Value

use std::fmt;
use std::hash::{Hash, Hasher};

use super::*;

/// Rendering of a payload whose slot is mutably borrowed elsewhere
fn busy_text(type_name: &str) -> String {
    format!("<borrowed {}>", type_name)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => match slot.try_peek() {
                Some(holder) => f.write_str(&holder.render()),
                None => f.write_str(&busy_text(slot.type_name())),
            },
            None => f.write_str(NULL_TEXT),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Some(slot) => {
                let rendered = match slot.try_peek() {
                    Some(holder) => holder.render(),
                    None => busy_text(slot.type_name()),
                };
                write!(f, "{}({})", slot.type_name(), rendered)?;
                match slot.protection() {
                    ProtectionLevel::Mutable => Ok(()),
                    level => write!(f, " [{}]", level),
                }
            }
            None => f.write_str(NULL_TEXT),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (&self.slot, &other.slot) {
            (Some(a), Some(b)) if Rc::ptr_eq(a, b) => true,
            (Some(a), Some(b)) => match (a.try_peek(), b.try_peek()) {
                (Some(mine), Some(theirs)) => mine.compare(&**theirs),
                _ => false,
            },
            (None, None) => true,
            _ => false,
        }
    }
}

// Handles sharing a slot are always equal. Across slots, equality is the
// payload's own: NaN floats and payloads that keep the default `equals` never
// match a separate copy, and a mutably borrowed slot matches only itself.
impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}
