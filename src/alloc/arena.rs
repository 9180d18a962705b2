//! A bounded fixed-slot arena.
//!
//! Reduction runs create short-lived objects of one known layout (the
//! neighbour cursors held by the DFS stack). `SlotArena` serves those from a
//! single upfront slab with a free-slot bitmap, so the hot loop never touches
//! the backing allocator; requests of any other layout, or overflow past the
//! slab, fall through to the backing allocator.

use core::alloc::Layout;
use core::cell::RefCell;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

use crate::alloc::{Allocator, Global};
use crate::collections::Bitmap;
use crate::error::{Error, Result};

/// Headroom beyond the nominal capacity, for transient copies made while a
/// slot's owner is being moved.
const SLOT_SLACK: usize = 10;

/// A fixed-slot arena with fall-through.
///
/// The arena is built for one `slot` layout and `capacity` concurrent live
/// slots (plus slack). It implements [`Allocator`], so sequences can be
/// backed by `&SlotArena` like any other handle; its lifetime is scoped to a
/// single reducer invocation.
pub struct SlotArena<A: Allocator + Clone = Global> {
    slab: NonNull<u8>,
    slab_layout: Layout,
    slot: Layout,
    stride: usize,
    slots: usize,
    free: RefCell<Bitmap<A>>,
    backing: A,
}

impl<A: Allocator + Clone> SlotArena<A> {
    /// Creates an arena of `capacity + slack` slots of layout `slot`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] for a zero-sized slot layout,
    /// [`Error::OutOfMemory`] if the slab cannot be allocated.
    pub fn new(slot: Layout, capacity: usize, backing: A) -> Result<Self> {
        if slot.size() == 0 {
            return Err(Error::InvalidArgument);
        }
        let stride = slot.pad_to_align().size();
        let slots = capacity
            .checked_add(SLOT_SLACK)
            .ok_or(Error::InvalidArgument)?;
        let slab_layout = Layout::from_size_align(
            stride.checked_mul(slots).ok_or(Error::OutOfMemory)?,
            slot.align(),
        )
        .map_err(|_| Error::InvalidArgument)?;
        let slab = backing.allocate(slab_layout)?;
        let free = match Bitmap::filled(slots, true, backing.clone()) {
            Ok(map) => map,
            Err(e) => {
                // SAFETY: `slab` was just allocated with `slab_layout`.
                unsafe { backing.deallocate(slab, slab_layout) };
                return Err(e);
            }
        };
        Ok(Self {
            slab,
            slab_layout,
            slot,
            stride,
            slots,
            free: RefCell::new(free),
            backing,
        })
    }

    /// Number of slots, including slack.
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Number of currently free slots.
    pub fn free_slots(&self) -> usize {
        self.free.borrow().count(true)
    }

    /// Moves `value` into an arena slot and returns an owning handle.
    ///
    /// Falls back to the backing allocator when `T` does not fit the slot
    /// layout or the slab is exhausted.
    pub fn boxed<T>(&self, value: T) -> Result<ArenaBox<'_, T, A>> {
        let ptr = self.allocate(Layout::new::<T>())?.cast::<T>();
        // SAFETY: `ptr` is valid for writes of `T` by the allocate contract.
        unsafe { ptr.as_ptr().write(value) };
        Ok(ArenaBox {
            ptr,
            arena: self,
            _owned: PhantomData,
        })
    }

    fn slot_index(&self, ptr: NonNull<u8>) -> Option<usize> {
        let base = self.slab.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        if addr < base || addr >= base + self.stride * self.slots {
            return None;
        }
        Some((addr - base) / self.stride)
    }
}

impl<A: Allocator + Clone> Allocator for SlotArena<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if layout.size() <= self.slot.size() && layout.align() <= self.slot.align() {
            let mut free = self.free.borrow_mut();
            if let Some(idx) = free.first_set() {
                free.set(idx, false)?;
                // SAFETY: `idx < slots`, so the offset stays inside the slab.
                return Ok(unsafe {
                    NonNull::new_unchecked(self.slab.as_ptr().add(idx * self.stride))
                });
            }
        }
        self.backing.allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        match self.slot_index(ptr) {
            Some(idx) => {
                let was_free = self
                    .free
                    .borrow_mut()
                    .set(idx, true)
                    .unwrap_or_else(|_| unreachable!("slot index checked against slab bounds"));
                debug_assert!(!was_free, "double free of arena slot {idx}");
            }
            // SAFETY: the pointer is outside the slab, so it came from the
            // backing allocator with this layout.
            None => unsafe { self.backing.deallocate(ptr, layout) },
        }
    }
}

impl<A: Allocator + Clone> Drop for SlotArena<A> {
    fn drop(&mut self) {
        // SAFETY: `slab` was allocated from `backing` with `slab_layout`.
        unsafe { self.backing.deallocate(self.slab, self.slab_layout) };
    }
}

/// An owning handle to a value stored in a [`SlotArena`].
///
/// Dropping the box drops the value and returns its slot to the arena.
pub struct ArenaBox<'arena, T, A: Allocator + Clone = Global> {
    ptr: NonNull<T>,
    arena: &'arena SlotArena<A>,
    _owned: PhantomData<T>,
}

impl<T, A: Allocator + Clone> Deref for ArenaBox<'_, T, A> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: the box owns a live, initialized `T`.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T, A: Allocator + Clone> DerefMut for ArenaBox<'_, T, A> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: the box owns a live, initialized `T` exclusively.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T, A: Allocator + Clone> Drop for ArenaBox<'_, T, A> {
    fn drop(&mut self) {
        // SAFETY: the value is live and was allocated from `arena` with the
        // layout of `T`.
        unsafe {
            core::ptr::drop_in_place(self.ptr.as_ptr());
            self.arena
                .deallocate(self.ptr.cast::<u8>(), Layout::new::<T>());
        }
    }
}
