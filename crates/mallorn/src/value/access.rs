//! Typed access and copy-on-write cloning

use std::any::TypeId;
use std::cell::{Ref, RefMut};

use log::trace;

use super::Value;
use crate::error::{Result, ValueError};
use crate::payload::Payload;

fn mismatch<T: Payload>(found: &'static str) -> ValueError {
    ValueError::TypeMismatch {
        expected: T::type_name(),
        found,
    }
}

impl Value {
    /// Give this handle its own copy of the payload.
    ///
    /// The copy lives in a new slot at `Mutable` regardless of the old
    /// slot's level; siblings keep the old slot. Always duplicates, even when
    /// this handle is the only owner. Fails with
    /// [`ValueError::CannotDuplicate`] on a `Single` value, and does nothing
    /// on an empty one.
    pub fn clone_slot(&mut self) -> Result<()> {
        let Some(slot) = &self.slot else {
            return Ok(());
        };
        if !slot.protection().allows_duplicate() {
            return Err(ValueError::CannotDuplicate);
        }
        let fresh = slot.duplicate()?;
        trace!(
            "cloned {} slot ({} owners)",
            fresh.type_name(),
            self.use_count()
        );
        self.slot = Some(fresh);
        Ok(())
    }

    /// An independent, mutable copy of this value.
    ///
    /// Same failure conditions as [`clone_slot`](Value::clone_slot).
    pub fn exclusive_copy(&self) -> Result<Value> {
        let mut copy = self.clone();
        copy.clone_slot()?;
        Ok(copy)
    }

    /// Borrow the payload as a `T`. Never copies.
    ///
    /// Fails with [`ValueError::EmptyValue`] on an empty value and
    /// [`ValueError::TypeMismatch`] when the payload is not a `T`.
    pub fn read<T: Payload>(&self) -> Result<Ref<'_, T>> {
        let slot = self.slot.as_ref().ok_or(ValueError::EmptyValue)?;
        Ref::filter_map(slot.holder()?, |holder| holder.payload().downcast_ref::<T>())
            .map_err(|holder| mismatch::<T>(holder.type_name()))
    }

    /// A copy of the payload as a `T`.
    pub fn get<T: Payload>(&self) -> Result<T> {
        self.read::<T>().map(|value| value.duplicate())
    }

    /// Mutably borrow the payload as a `T`, copying it first.
    ///
    /// After the copy this handle owns a fresh `Mutable` slot, so siblings
    /// never observe the mutation. Fails like [`read`](Value::read), and with
    /// [`ValueError::MutationForbidden`] when the slot is `Constant` or
    /// `Single`.
    pub fn access<T: Payload>(&mut self) -> Result<RefMut<'_, T>> {
        self.access_with::<T>(false)
    }

    /// Mutably borrow the payload as a `T` in place.
    ///
    /// Siblings sharing the slot observe the mutation. Fails like
    /// [`access`](Value::access).
    pub fn access_raw<T: Payload>(&mut self) -> Result<RefMut<'_, T>> {
        self.access_with::<T>(true)
    }

    fn access_with<T: Payload>(&mut self, raw: bool) -> Result<RefMut<'_, T>> {
        let slot = self.slot.as_ref().ok_or(ValueError::EmptyValue)?;
        {
            let holder = slot.holder()?;
            if holder.type_identity() != TypeId::of::<T>() {
                return Err(mismatch::<T>(holder.type_name()));
            }
        }
        let level = slot.protection();
        if !level.allows_access() {
            return Err(ValueError::MutationForbidden { level });
        }

        if !raw {
            self.clone_slot()?;
        }

        let slot = self.slot.as_ref().ok_or(ValueError::EmptyValue)?;
        RefMut::filter_map(slot.holder_mut()?, |holder| {
            holder.payload_mut().downcast_mut::<T>()
        })
        .map_err(|holder| mismatch::<T>(holder.type_name()))
    }

    /// Let the payload sever aliasing with values it contains.
    ///
    /// Keeps this slot and its level. Fails with
    /// [`ValueError::CannotDuplicate`] on a `Single` value, and does nothing
    /// on an empty one.
    pub fn detach(&mut self) -> Result<()> {
        let Some(slot) = &self.slot else {
            return Ok(());
        };
        if !slot.protection().allows_duplicate() {
            return Err(ValueError::CannotDuplicate);
        }
        let mut holder = slot.holder_mut()?;
        holder.detach()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protection::ProtectionLevel;

    #[test]
    fn test_read_errors() {
        let empty = Value::empty();
        assert_eq!(empty.read::<i64>().unwrap_err(), ValueError::EmptyValue);

        let v = Value::new(1i64);
        assert_eq!(
            v.read::<String>().unwrap_err(),
            ValueError::TypeMismatch {
                expected: "String",
                found: "i64"
            }
        );
    }

    #[test]
    fn test_access_checks_protection_before_cloning() {
        let mut v = Value::make_constant(1i64);
        let sibling = v.clone();
        let err = v.access::<i64>().unwrap_err();
        assert_eq!(
            err,
            ValueError::MutationForbidden {
                level: ProtectionLevel::Constant
            }
        );
        assert!(v.is_same(&sibling));
    }

    #[test]
    fn test_clone_slot_always_copies() {
        // Sole owner, yet the protection reset shows a new slot was made.
        let mut v = Value::make_protected(1i64);
        assert_eq!(v.use_count(), 1);
        v.clone_slot().unwrap();
        assert_eq!(v.protection(), Some(ProtectionLevel::Mutable));
        assert_eq!(v.use_count(), 1);

        let alias = v.clone();
        v.clone_slot().unwrap();
        assert!(!v.is_same(&alias));
    }

    #[test]
    fn test_detach_on_single_fails() {
        let mut v = Value::make_single(vec![Value::from(1i64)]);
        assert_eq!(v.detach().unwrap_err(), ValueError::CannotDuplicate);
    }
}
