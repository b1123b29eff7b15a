//! Per-thread pooling allocator for holders
//!
//! Values churn constantly in a running script, and every one of them owns a
//! heap-allocated holder. Each payload type gets its own free list of
//! correctly sized cells; a cell released by a dropped holder is handed to
//! the next holder of the same type instead of going back to the global
//! allocator. When a free list runs dry it grows by a whole chunk of cells.
//!
//! Pools live in thread-local storage because values themselves never leave
//! their thread. They are created lazily on first use and reclaimed when the
//! thread exits. Releases that arrive after the thread's pools are gone fall
//! through to the global allocator.

use std::any::{type_name, Any, TypeId};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::mem::MaybeUninit;
use std::ptr;

use log::debug;

use crate::config::PoolConfig;
use crate::holder::TypedHolder;
use crate::payload::Payload;

thread_local! {
    static CONFIG: Cell<PoolConfig> = Cell::new(PoolConfig::default());
    static POOLS: RefCell<HashMap<TypeId, Box<dyn ErasedPool>>> = RefCell::new(HashMap::new());
}

/// Occupancy counters for one pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Cells currently holding a live object
    pub live: usize,

    /// Cells waiting on the free list
    pub free: usize,

    /// Number of times the pool has grown
    pub chunks: usize,
}

/// Type-erased view of a `Pool<T>`, so pools of every cell type share one map.
trait ErasedPool {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn trim(&mut self) -> usize;
}

struct Pool<T> {
    free: Vec<Box<MaybeUninit<T>>>,
    live: usize,
    chunks: usize,
}

impl<T> Pool<T> {
    fn new() -> Self {
        Self {
            free: Vec::new(),
            live: 0,
            chunks: 0,
        }
    }

    fn take(&mut self, config: PoolConfig) -> Box<MaybeUninit<T>> {
        self.live += 1;
        if !config.enabled {
            return Box::new_uninit();
        }
        if self.free.is_empty() {
            self.grow(config.chunk_size.max(1));
        }
        self.free.pop().unwrap_or_else(Box::new_uninit)
    }

    fn grow(&mut self, chunk_size: usize) {
        self.free.reserve(chunk_size);
        self.free.extend((0..chunk_size).map(|_| Box::new_uninit()));
        self.chunks += 1;
        debug!(
            "holder pool for {} grew by {} cells ({} chunks)",
            type_name::<T>(),
            chunk_size,
            self.chunks
        );
    }

    fn give_back(&mut self, cell: Box<MaybeUninit<T>>, config: PoolConfig) {
        self.live = self.live.saturating_sub(1);
        if config.enabled {
            self.free.push(cell);
        }
    }

    fn stats(&self) -> PoolStats {
        PoolStats {
            live: self.live,
            free: self.free.len(),
            chunks: self.chunks,
        }
    }
}

impl<T: 'static> ErasedPool for Pool<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn trim(&mut self) -> usize {
        let released = self.free.len();
        self.free = Vec::new();
        released
    }
}

/// Replace the calling thread's pool configuration.
pub fn configure(config: PoolConfig) {
    debug!(
        "holder pools configured: chunk_size={}, enabled={}",
        config.chunk_size, config.enabled
    );
    let _ = CONFIG.try_with(|cell| cell.set(config));
}

/// The calling thread's pool configuration.
pub fn config() -> PoolConfig {
    CONFIG.try_with(Cell::get).unwrap_or_default()
}

/// Occupancy of the calling thread's holder pool for payload type `T`.
pub fn holder_stats<T: Payload>() -> PoolStats {
    stats::<TypedHolder<T>>()
}

/// Drop every free cell held by the calling thread's pools.
///
/// Live objects are untouched. Returns the number of cells released.
pub fn release_free() -> usize {
    POOLS
        .try_with(|pools| match pools.try_borrow_mut() {
            Ok(mut pools) => pools.values_mut().map(|pool| pool.trim()).sum(),
            Err(_) => 0,
        })
        .unwrap_or(0)
}

pub(crate) fn stats<T: 'static>() -> PoolStats {
    POOLS
        .try_with(|pools| {
            pools
                .borrow()
                .get(&TypeId::of::<T>())
                .and_then(|pool| pool.as_any().downcast_ref::<Pool<T>>())
                .map(Pool::stats)
                .unwrap_or_default()
        })
        .unwrap_or_default()
}

/// Move `value` into a pooled heap cell.
pub(crate) fn alloc<T: 'static>(value: T) -> Box<T> {
    let config = config();
    let cell = POOLS
        .try_with(|pools| {
            let mut pools = pools.try_borrow_mut().ok()?;
            pools
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Box::new(Pool::<T>::new()) as Box<dyn ErasedPool>)
                .as_any_mut()
                .downcast_mut::<Pool<T>>()
                .map(|pool| pool.take(config))
        })
        .ok()
        .flatten();

    let mut cell = cell.unwrap_or_else(Box::new_uninit);
    cell.write(value);
    // SAFETY: the cell was fully initialized by the write above.
    unsafe { cell.assume_init() }
}

/// Drop the object in `boxed` and return its cell to the pool.
pub(crate) fn free<T: 'static>(boxed: Box<T>) {
    let raw = Box::into_raw(boxed);
    // SAFETY: `raw` is the unique pointer of a live `Box<T>`. The value is
    // dropped exactly once here, and `MaybeUninit<T>` has the layout of `T`,
    // so the allocation can be re-owned as an uninitialized cell.
    let cell = unsafe {
        ptr::drop_in_place(raw);
        Box::from_raw(raw.cast::<MaybeUninit<T>>())
    };

    // The payload is dropped before the pools are borrowed: dropping it may
    // release nested values, which come back through here.
    let config = config();
    let _ = POOLS.try_with(move |pools| {
        let Ok(mut pools) = pools.try_borrow_mut() else {
            return;
        };
        let pool = pools
            .get_mut(&TypeId::of::<T>())
            .and_then(|pool| pool.as_any_mut().downcast_mut::<Pool<T>>());
        if let Some(pool) = pool {
            pool.give_back(cell, config);
        }
    });
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_grows_by_chunks() {
        configure(PoolConfig::with_chunk_size(4));
        let cells: Vec<Box<String>> = (0..5).map(|i| alloc(i.to_string())).collect();
        assert_eq!(
            stats::<String>(),
            PoolStats {
                live: 5,
                free: 3,
                chunks: 2
            }
        );
        assert_eq!(*cells[4], "4");
        for cell in cells {
            free(cell);
        }
        assert_eq!(stats::<String>().live, 0);
        assert_eq!(stats::<String>().free, 8);
    }

    #[test]
    fn test_free_reuses_cell() {
        configure(PoolConfig::with_chunk_size(1));
        let first = alloc(7u64);
        let addr = &*first as *const u64 as usize;
        free(first);
        let second = alloc(9u64);
        assert_eq!(&*second as *const u64 as usize, addr);
        assert_eq!(*second, 9);
        assert_eq!(stats::<u64>().chunks, 1);
        free(second);
    }

    #[test]
    fn test_free_drops_payload() {
        let tracker = Rc::new(());
        let cell = alloc(Rc::clone(&tracker));
        assert_eq!(Rc::strong_count(&tracker), 2);
        free(cell);
        assert_eq!(Rc::strong_count(&tracker), 1);
    }

    #[test]
    fn test_disabled_pool_keeps_no_cells() {
        configure(PoolConfig::disabled());
        let cell = alloc(1i32);
        assert_eq!(stats::<i32>().free, 0);
        free(cell);
        assert_eq!(
            stats::<i32>(),
            PoolStats {
                live: 0,
                free: 0,
                chunks: 0
            }
        );
    }

    #[test]
    fn test_release_free() {
        configure(PoolConfig::with_chunk_size(8));
        let cell = alloc('x');
        free(cell);
        assert_eq!(release_free(), 8);
        assert_eq!(stats::<char>().free, 0);
    }
}
