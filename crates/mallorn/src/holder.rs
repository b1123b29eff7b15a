//! Type-erased payload holders
//!
//! A holder owns exactly one payload and exposes the [`Payload`] behavior of
//! its concrete type through an object-safe trait. Holders are allocated from
//! and returned to the per-thread pools in [`crate::pool`].

use std::any::{Any, TypeId};
use std::mem::ManuallyDrop;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use crate::error::Result;
use crate::extension::ExtensionTable;
use crate::payload::Payload;
use crate::pool;

/// Capability set shared by every holder.
pub(crate) trait Holder {
    fn type_identity(&self) -> TypeId;
    fn type_name(&self) -> &'static str;
    fn duplicate(&self) -> HolderBox;
    /// False without consulting the payload when the types differ.
    fn compare(&self, other: &dyn Holder) -> bool;
    fn to_integer(&self) -> i64;
    fn render(&self) -> String;
    fn hash_code(&self) -> u64;
    fn detach(&mut self) -> Result<()>;
    fn extensions(&self) -> Arc<ExtensionTable>;
    fn payload(&self) -> &dyn Any;
    fn payload_mut(&mut self) -> &mut dyn Any;
    /// Drop the payload and return this holder's memory to its pool.
    fn destroy(self: Box<Self>);
}

/// The holder for payload type `T`.
pub(crate) struct TypedHolder<T: Payload> {
    data: T,
}

impl<T: Payload> TypedHolder<T> {
    /// Allocate a holder for `data` from the pool.
    pub(crate) fn boxed(data: T) -> HolderBox {
        HolderBox::new(pool::alloc(TypedHolder { data }))
    }
}

impl<T: Payload> Holder for TypedHolder<T> {
    fn type_identity(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn duplicate(&self) -> HolderBox {
        TypedHolder::boxed(self.data.duplicate())
    }

    fn compare(&self, other: &dyn Holder) -> bool {
        if other.type_identity() != self.type_identity() {
            return false;
        }
        other
            .payload()
            .downcast_ref::<T>()
            .is_some_and(|theirs| self.data.equals(theirs))
    }

    fn to_integer(&self) -> i64 {
        self.data.to_integer()
    }

    fn render(&self) -> String {
        self.data.render()
    }

    fn hash_code(&self) -> u64 {
        self.data.hash_code()
    }

    fn detach(&mut self) -> Result<()> {
        self.data.detach()
    }

    fn extensions(&self) -> Arc<ExtensionTable> {
        T::extensions()
    }

    fn payload(&self) -> &dyn Any {
        &self.data
    }

    fn payload_mut(&mut self) -> &mut dyn Any {
        &mut self.data
    }

    fn destroy(self: Box<Self>) {
        pool::free(self);
    }
}

/// Owning pointer to a holder that destroys it through the pool on drop.
pub(crate) struct HolderBox(ManuallyDrop<Box<dyn Holder>>);

impl HolderBox {
    fn new(holder: Box<dyn Holder>) -> Self {
        HolderBox(ManuallyDrop::new(holder))
    }
}

impl Drop for HolderBox {
    fn drop(&mut self) {
        // SAFETY: the box is taken exactly once, here, and never used again.
        let holder = unsafe { ManuallyDrop::take(&mut self.0) };
        holder.destroy();
    }
}

impl Deref for HolderBox {
    type Target = dyn Holder;

    fn deref(&self) -> &Self::Target {
        &**self.0
    }
}

impl DerefMut for HolderBox {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut **self.0
    }
}
