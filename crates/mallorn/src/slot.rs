//! The reference-counted storage cell behind every non-empty value

use std::any::TypeId;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::mem;
use std::rc::Rc;

use crate::error::Result;
use crate::holder::HolderBox;
use crate::protection::ProtectionLevel;

/// Shared storage for one payload.
///
/// A slot is only ever reached through `Rc<Slot>` handles held by values, so
/// the strong count is exactly the number of co-owning values. Dropping the
/// last handle drops the holder, which returns it to its pool.
///
/// The payload type is mirrored outside the `RefCell` so it stays readable
/// while a sibling holds a mutable guard.
pub(crate) struct Slot {
    protection: Cell<ProtectionLevel>,
    kind: Cell<(TypeId, &'static str)>,
    holder: RefCell<HolderBox>,
}

impl Slot {
    pub(crate) fn shared(protection: ProtectionLevel, holder: HolderBox) -> Rc<Slot> {
        Rc::new(Slot {
            protection: Cell::new(protection),
            kind: Cell::new(kind_of(&holder)),
            holder: RefCell::new(holder),
        })
    }

    pub(crate) fn protection(&self) -> ProtectionLevel {
        self.protection.get()
    }

    /// Move the slot up to `level`. Callers check the transition is legal.
    pub(crate) fn raise(&self, level: ProtectionLevel) {
        debug_assert!(level >= self.protection.get());
        self.protection.set(level);
    }

    pub(crate) fn type_identity(&self) -> TypeId {
        self.kind.get().0
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.kind.get().1
    }

    /// Shared borrow of the holder, or `None` while it is mutably borrowed.
    pub(crate) fn try_peek(&self) -> Option<Ref<'_, HolderBox>> {
        self.holder.try_borrow().ok()
    }

    pub(crate) fn holder(&self) -> Result<Ref<'_, HolderBox>> {
        Ok(self.holder.try_borrow()?)
    }

    pub(crate) fn holder_mut(&self) -> Result<RefMut<'_, HolderBox>> {
        Ok(self.holder.try_borrow_mut()?)
    }

    /// A new, unshared, mutable slot holding a copy of this slot's payload.
    pub(crate) fn duplicate(&self) -> Result<Rc<Slot>> {
        let copy = self.holder()?.duplicate();
        Ok(Slot::shared(ProtectionLevel::Mutable, copy))
    }

    /// Exchange holders with `other`, keeping both slot identities.
    pub(crate) fn swap_holders(&self, other: &Slot) -> Result<()> {
        let mut mine = self.holder_mut()?;
        let mut theirs = other.holder_mut()?;
        mem::swap(&mut *mine, &mut *theirs);
        self.kind.swap(&other.kind);
        Ok(())
    }

    /// Install a new holder, keeping the slot identity.
    pub(crate) fn replace_holder(&self, holder: HolderBox) -> Result<()> {
        let kind = kind_of(&holder);
        let previous = mem::replace(&mut *self.holder_mut()?, holder);
        self.kind.set(kind);
        // Released after the borrow ends; the old payload may own values.
        drop(previous);
        Ok(())
    }
}

fn kind_of(holder: &HolderBox) -> (TypeId, &'static str) {
    (holder.type_identity(), holder.type_name())
}
