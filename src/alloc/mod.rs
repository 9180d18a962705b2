//! Allocator injection.
//!
//! Every container in this crate acquires and releases backing memory through
//! an installed [`Allocator`] handle instead of reaching for the global heap
//! directly. The default handle is [`Global`]; [`SlotArena`] is a bounded
//! fixed-slot arena scoped to a single reducer invocation.

use core::alloc::Layout;
use core::ptr::NonNull;

use crate::error::{Error, Result};

mod arena;

pub use arena::{ArenaBox, SlotArena};

/// A byte allocator handle.
///
/// Handles are cheap values (`Global` is a unit struct, arenas are passed by
/// reference) so containers store them by value and clone them into child
/// containers.
pub trait Allocator {
    /// Allocates a block described by `layout`.
    ///
    /// # Errors
    /// Returns [`Error::OutOfMemory`] if the request cannot be satisfied.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>>;

    /// Deallocates a block previously returned by [`allocate`](Self::allocate).
    ///
    /// # Safety
    /// `ptr` must denote a live block obtained from this allocator and
    /// `layout` must be the layout it was allocated with.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);
}

impl<A: Allocator + ?Sized> Allocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        (**self).allocate(layout)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        (**self).deallocate(ptr, layout);
    }
}

/// The process-wide allocator.
///
/// Zero-size allocations are served with a dangling, well-aligned pointer and
/// never touch the heap.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Global;

impl Allocator for Global {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>> {
        if layout.size() == 0 {
            // SAFETY: alignments are non-zero powers of two.
            return Ok(unsafe { NonNull::new_unchecked(layout.align() as *mut u8) });
        }
        // SAFETY: layout has non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(Error::OutOfMemory)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            // SAFETY: per the trait contract, `ptr` was allocated by
            // `std::alloc::alloc` with this layout.
            unsafe { std::alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}
