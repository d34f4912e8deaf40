//! Bump-pointer arena for transient diff allocations.
//!
//! The arena owns a single byte buffer and a cursor. Allocation aligns the
//! cursor up to word size and advances it; the buffer doubles as needed up
//! to a hard cap. Individual frees do not exist: [`Arena::reset`] rewinds
//! the cursor and [`Arena::cleanup`] releases the buffer in one step.
//!
//! Interior mutability lets a shared reference allocate, so an arena can be
//! threaded through a call via [`crate::DiffOptions`] without exclusive
//! borrows. Arenas are not `Sync`; each thread uses its own.

use std::cell::{Cell, RefCell};

use crate::error::Error;

/// Default ceiling for arena growth, in bytes.
pub const MAX_ARENA_SIZE: usize = 16 * 1024 * 1024;

const WORD_SIZE: usize = std::mem::size_of::<u64>();

pub struct Arena {
    buf: RefCell<Vec<u8>>,
    offset: Cell<usize>,
    max_capacity: usize,
}

impl Arena {
    /// Arena with the given initial capacity and the default cap.
    pub fn new(initial_capacity: usize) -> Self {
        Self::with_max_capacity(initial_capacity, MAX_ARENA_SIZE)
    }

    /// Arena with an explicit growth ceiling.
    pub fn with_max_capacity(initial_capacity: usize, max_capacity: usize) -> Self {
        Self {
            buf: RefCell::new(vec![0; initial_capacity.min(max_capacity)]),
            offset: Cell::new(0),
            max_capacity,
        }
    }

    /// Reserves `size` bytes and returns the word-aligned offset of the
    /// block. Fails with [`Error::OutOfMemory`] when the arithmetic would
    /// overflow or the buffer would have to grow past the cap.
    pub fn allocate(&self, size: usize) -> Result<usize, Error> {
        let aligned = self
            .offset
            .get()
            .checked_add(WORD_SIZE - 1)
            .ok_or(Error::OutOfMemory)?
            & !(WORD_SIZE - 1);
        let end = aligned.checked_add(size).ok_or(Error::OutOfMemory)?;

        let mut buf = self.buf.borrow_mut();
        if end > buf.len() {
            if end > self.max_capacity {
                return Err(Error::OutOfMemory);
            }
            let mut grown = buf.len().max(WORD_SIZE);
            while grown < end {
                grown = grown.checked_mul(2).ok_or(Error::OutOfMemory)?;
            }
            buf.resize(grown.min(self.max_capacity), 0);
        }

        self.offset.set(end);
        Ok(aligned)
    }

    /// Rewinds the cursor to zero, keeping the buffer for reuse.
    pub fn reset(&self) {
        self.offset.set(0);
    }

    /// Releases the backing buffer and rewinds the cursor.
    pub fn cleanup(&self) {
        *self.buf.borrow_mut() = Vec::new();
        self.offset.set(0);
    }

    /// Bytes currently handed out.
    pub fn used(&self) -> usize {
        self.offset.get()
    }

    /// Current buffer size.
    pub fn capacity(&self) -> usize {
        self.buf.borrow().len()
    }

    /// Reserves a row of `len` words.
    pub(crate) fn allocate_words(&self, len: usize) -> Result<usize, Error> {
        self.allocate(len.checked_mul(WORD_SIZE).ok_or(Error::OutOfMemory)?)
    }

    /// Copies `words` into the block at `offset`.
    pub(crate) fn store_words(&self, offset: usize, words: &[i64]) {
        let mut buf = self.buf.borrow_mut();
        for (i, word) in words.iter().enumerate() {
            let at = offset + i * WORD_SIZE;
            buf[at..at + WORD_SIZE].copy_from_slice(&word.to_ne_bytes());
        }
    }

    /// Reads the `index`-th word of the block at `offset`.
    pub(crate) fn load_word(&self, offset: usize, index: usize) -> i64 {
        let buf = self.buf.borrow();
        let at = offset + index * WORD_SIZE;
        let mut bytes = [0u8; WORD_SIZE];
        bytes.copy_from_slice(&buf[at..at + WORD_SIZE]);
        i64::from_ne_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocations_are_word_aligned() {
        let arena = Arena::new(256);
        let a = arena.allocate(3).unwrap();
        let b = arena.allocate(3).unwrap();
        assert_eq!(a % WORD_SIZE, 0);
        assert_eq!(b % WORD_SIZE, 0);
        assert!(b >= a + 3);
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let arena = Arena::new(16);
        arena.allocate(64).unwrap();
        assert!(arena.capacity() >= 64);
    }

    #[test]
    fn test_fails_at_cap() {
        let arena = Arena::with_max_capacity(16, 64);
        assert!(arena.allocate(32).is_ok());
        assert!(matches!(arena.allocate(64), Err(Error::OutOfMemory)));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let arena = Arena::new(16);
        assert!(matches!(arena.allocate(usize::MAX), Err(Error::OutOfMemory)));
        assert!(matches!(
            arena.allocate_words(usize::MAX / 4),
            Err(Error::OutOfMemory)
        ));
    }

    #[test]
    fn test_reset_rewinds_but_keeps_buffer() {
        let arena = Arena::new(16);
        arena.allocate(128).unwrap();
        let grown = arena.capacity();
        arena.reset();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.capacity(), grown);
    }

    #[test]
    fn test_cleanup_releases_buffer() {
        let arena = Arena::new(1024);
        arena.allocate(512).unwrap();
        arena.cleanup();
        assert_eq!(arena.used(), 0);
        assert_eq!(arena.capacity(), 0);
        // The arena is reusable after cleanup; it simply regrows.
        assert!(arena.allocate(32).is_ok());
    }

    #[test]
    fn test_word_roundtrip() {
        let arena = Arena::new(256);
        let row = arena.allocate_words(4).unwrap();
        arena.store_words(row, &[-1, 0, 7, i64::MAX]);
        assert_eq!(arena.load_word(row, 0), -1);
        assert_eq!(arena.load_word(row, 2), 7);
        assert_eq!(arena.load_word(row, 3), i64::MAX);
    }
}
