//! # Mallorn
//!
//! Dynamic values for scripting-language runtimes.
//!
//! A [`Value`] can hold a payload of any [`Payload`] type and compare, hash,
//! and print it without static knowledge of that type. Values share storage
//! cheaply by reference counting and enforce a graduated immutability policy
//! through [`ProtectionLevel`], so one mechanism covers `var` bindings,
//! read-only bindings, compile-time constants, and singletons.
//!
//! ## Architecture
//!
//! - **Payload**: per-type behavior (equality, hashing, rendering, detach)
//! - **Holder**: a type-erased box around one payload, allocated from a
//!   per-thread [`pool`]
//! - **Slot**: the reference-counted cell holding a holder and its
//!   protection level
//! - **Value**: the public handle; sharing, copy-on-write, protection,
//!   typed access, and raw (in-place) swap/assign
//!
//! Values are single-threaded: they are neither `Send` nor `Sync`.
//!
//! ## Example
//!
//! ```
//! use mallorn::{ErrorKind, Value};
//!
//! let mut a = Value::new(5i64);
//! a.protect().unwrap();
//!
//! let mut c = Value::new(7i64);
//! let err = a.swap_raw(&mut c).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::ProtectedMutation);
//! assert_eq!(*a.read::<i64>().unwrap(), 5);
//! assert_eq!(*c.read::<i64>().unwrap(), 7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod extension;
mod holder;
pub mod payload;
pub mod pool;
pub mod protection;
mod slot;
pub mod value;

// Re-export main types
pub use config::PoolConfig;
pub use error::{ErrorKind, Result, ValueError};
pub use extension::{ExtensionFn, ExtensionRegistry, ExtensionTable};
pub use payload::{hash_of, Payload};
pub use pool::PoolStats;
pub use protection::ProtectionLevel;
pub use value::{Null, Value, EMPTY_HASH};

/// Mallorn version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
