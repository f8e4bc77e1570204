//! A bump allocator for scratch field elements.
//!
//! Batch operations (batch inversion, batch affine addition) need temporary
//! buffers whose size depends on the batch. Instead of allocating on every
//! call, each thread owns one [`Arena`] and hands out [`ArenaSlice`] handles
//! from it. Handles are plain offsets, so they stay valid when the arena grows;
//! they are released all at once with [`Arena::rollback`] or [`Arena::reset`].

use std::marker::PhantomData;

/// Opaque handle to a contiguous run of elements inside an [`Arena`].
#[derive(Debug)]
pub struct ArenaSlice<T> {
    start: usize,
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for ArenaSlice<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaSlice<T> {}

impl<T> ArenaSlice<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Saved position of the bump pointer, see [`Arena::mark`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArenaMark(usize);

/// Bump-pointer arena of `T`s with explicit reset.
#[derive(Debug, Default)]
pub struct Arena<T> {
    buffer: Vec<T>,
    top: usize,
}

impl<T: Copy + Default> Arena<T> {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            top: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity],
            top: 0,
        }
    }

    /// Reserves `len` elements. The contents are whatever the previous user
    /// of that memory left behind.
    pub fn alloc(&mut self, len: usize) -> ArenaSlice<T> {
        let start = self.top;
        self.top += len;
        if self.top > self.buffer.len() {
            let target = self.top.max(2 * self.buffer.len());
            self.buffer.resize(target, T::default());
        }
        ArenaSlice {
            start,
            len,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, slice: ArenaSlice<T>) -> &[T] {
        &self.buffer[slice.start..slice.start + slice.len]
    }

    pub fn get_mut(&mut self, slice: ArenaSlice<T>) -> &mut [T] {
        &mut self.buffer[slice.start..slice.start + slice.len]
    }

    pub fn mark(&self) -> ArenaMark {
        ArenaMark(self.top)
    }

    /// Frees everything allocated since `mark` was taken.
    pub fn rollback(&mut self, mark: ArenaMark) {
        debug_assert!(mark.0 <= self.top, "rolling back to a mark above the top");
        self.top = mark.0;
    }

    pub fn reset(&mut self) {
        self.top = 0;
    }

    /// Number of elements currently handed out.
    pub fn used(&self) -> usize {
        self.top
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_is_bump_and_rollback_reuses() {
        let mut arena = Arena::<u64>::with_capacity(4);
        let a = arena.alloc(3);
        arena.get_mut(a).copy_from_slice(&[1, 2, 3]);

        let mark = arena.mark();
        let b = arena.alloc(10);
        assert_eq!(arena.used(), 13);
        assert!(arena.capacity() >= 13);
        arena.get_mut(b).fill(7);

        // growing the buffer keeps earlier handles valid
        assert_eq!(arena.get(a), &[1, 2, 3]);

        arena.rollback(mark);
        assert_eq!(arena.used(), 3);
        let c = arena.alloc(2);
        assert_eq!(arena.get(c), &[7, 7]);

        arena.reset();
        assert_eq!(arena.used(), 0);
    }
}
