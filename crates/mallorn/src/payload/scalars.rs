//! Payload implementations for numbers, booleans, characters and strings

use super::{hash_of, Payload};

macro_rules! integer_payload {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Payload for $ty {
                fn equals(&self, other: &Self) -> bool {
                    self == other
                }

                fn to_integer(&self) -> i64 {
                    *self as i64
                }

                fn render(&self) -> String {
                    self.to_string()
                }

                fn hash_code(&self) -> u64 {
                    hash_of(self)
                }

                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }
        )*
    };
}

macro_rules! float_payload {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Payload for $ty {
                fn equals(&self, other: &Self) -> bool {
                    self == other
                }

                // Saturating; NaN becomes 0.
                fn to_integer(&self) -> i64 {
                    *self as i64
                }

                fn render(&self) -> String {
                    self.to_string()
                }

                fn hash_code(&self) -> u64 {
                    // 0.0 == -0.0, so they must hash alike
                    let normalized = if *self == 0.0 { 0.0 } else { *self };
                    hash_of(&normalized.to_bits())
                }

                fn type_name() -> &'static str {
                    stringify!($ty)
                }
            }
        )*
    };
}

integer_payload!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
float_payload!(f32, f64);

impl Payload for bool {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn to_integer(&self) -> i64 {
        i64::from(*self)
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn hash_code(&self) -> u64 {
        hash_of(self)
    }

    fn type_name() -> &'static str {
        "bool"
    }
}

impl Payload for char {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn to_integer(&self) -> i64 {
        i64::from(u32::from(*self))
    }

    fn render(&self) -> String {
        self.to_string()
    }

    fn hash_code(&self) -> u64 {
        hash_of(self)
    }

    fn type_name() -> &'static str {
        "char"
    }
}

impl Payload for String {
    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    /// Parses the trimmed text as a decimal integer, `0` if it is not one.
    fn to_integer(&self) -> i64 {
        self.trim().parse().unwrap_or(0)
    }

    fn render(&self) -> String {
        self.clone()
    }

    fn hash_code(&self) -> u64 {
        hash_of(self)
    }

    fn type_name() -> &'static str {
        "String"
    }
}
