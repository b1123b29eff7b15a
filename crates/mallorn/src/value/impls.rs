//! Value convenience constructors and From traits

use indexmap::IndexMap;

use super::Value;

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::new(s.into())
    }

    /// Create an array value
    pub fn array(items: Vec<Value>) -> Self {
        Value::new(items)
    }

    /// Create a map value
    pub fn map(entries: IndexMap<String, Value>) -> Self {
        Value::new(entries)
    }

    /// Extract as i64 if the payload is exactly an `i64`
    pub fn as_i64(&self) -> Option<i64> {
        self.read::<i64>().ok().map(|n| *n)
    }

    /// Extract as bool if the payload is a `bool`
    pub fn as_bool(&self) -> Option<bool> {
        self.read::<bool>().ok().map(|b| *b)
    }
}

macro_rules! from_payload {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::new(value)
                }
            }
        )*
    };
}

from_payload!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, char, String
);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(entries: IndexMap<String, Value>) -> Self {
        Value::map(entries)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(opt: Option<T>) -> Self {
        opt.map_or_else(Value::empty, Value::from)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::array(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(5u8).type_name(), "u8");
        assert_eq!(Value::from("x").type_name(), "String");
        assert_eq!(Value::from(vec![Value::from(1i64)]).type_name(), "array");
        assert!(Value::from(None::<i64>).is_empty());
        assert_eq!(Value::from(Some(2i64)).as_i64(), Some(2));
    }

    #[test]
    fn test_collect_into_array() {
        let v: Value = (1..=3i64).map(Value::from).collect();
        assert_eq!(v.to_string(), "[1, 2, 3]");
        assert_eq!(v.as_bool(), None);
    }
}
