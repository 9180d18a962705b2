//! `Bitmap` — a bit-packed boolean sequence.
//!
//! Bits are packed into machine words held by a [`SectionedSeq`], so a bitmap
//! over millions of entries is a handful of uniform section allocations.
//! Random access is a word-and-mask operation; insertion and removal shift in
//! bit order, rippling the carried bit through each following word; counting
//! uses the hardware popcount on whole words and masks the tail.

use crate::alloc::{Allocator, Global};
use crate::collections::{SectionedSeq, Sequence};
use crate::error::{Error, Result};

/// Bits per backing word.
const WORD_BITS: usize = usize::BITS as usize;

/// Words per backing section.
const SECTION_WORDS: usize = 128;

/// A growable sequence of bits.
pub struct Bitmap<A: Allocator + Clone = Global> {
    words: SectionedSeq<usize, A>,
    len: usize,
}

impl Bitmap<Global> {
    /// Creates an empty bitmap on the process allocator.
    pub fn empty() -> Result<Self> {
        Self::new(Global)
    }
}

impl<A: Allocator + Clone> Bitmap<A> {
    /// Creates an empty bitmap backed by `alloc`.
    pub fn new(alloc: A) -> Result<Self> {
        Ok(Self {
            words: SectionedSeq::with_section_size(SECTION_WORDS, alloc)?,
            len: 0,
        })
    }

    /// Creates a bitmap of `len` bits, all set to `value`.
    pub fn filled(len: usize, value: bool, alloc: A) -> Result<Self> {
        let mut bits = Self::new(alloc)?;
        let word = if value { usize::MAX } else { 0 };
        for _ in 0..len.div_ceil(WORD_BITS) {
            bits.words.push(word)?;
        }
        bits.len = len;
        Ok(bits)
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the bitmap holds no bits.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of bit slots currently backed by memory.
    pub fn allocated(&self) -> usize {
        self.words.allocated() * WORD_BITS
    }

    /// Reads the bit at `idx`.
    pub fn get(&self, idx: usize) -> Result<bool> {
        if idx >= self.len {
            return Err(Error::InvalidIndex);
        }
        let word = self.words.get(idx / WORD_BITS)?;
        Ok((word >> (idx % WORD_BITS)) & 1 == 1)
    }

    /// Writes the bit at `idx`, returning the previous value.
    pub fn set(&mut self, idx: usize, value: bool) -> Result<bool> {
        if idx >= self.len {
            return Err(Error::InvalidIndex);
        }
        let word = self.words.get_mut(idx / WORD_BITS)?;
        let mask = 1usize << (idx % WORD_BITS);
        let old = *word & mask != 0;
        if value {
            *word |= mask;
        } else {
            *word &= !mask;
        }
        Ok(old)
    }

    /// Appends a bit; equivalent to `insert(len, value)`.
    pub fn push(&mut self, value: bool) -> Result<()> {
        self.insert(self.len, value)
    }

    /// Inserts a bit at `idx`, shifting all bits at `[idx, len)` one place
    /// towards higher positions.
    pub fn insert(&mut self, idx: usize, value: bool) -> Result<()> {
        if idx > self.len {
            return Err(Error::InvalidIndex);
        }
        if self.len % WORD_BITS == 0 {
            self.words.push(0)?;
        }
        let used = self.len / WORD_BITS + 1;
        let word_idx = idx / WORD_BITS;
        let bit = idx % WORD_BITS;

        let word = self.words.get_mut(word_idx)?;
        let low_mask = (1usize << bit) - 1;
        let mut carry = *word >> (WORD_BITS - 1);
        let mut split = (*word & low_mask) | ((*word & !low_mask) << 1);
        if value {
            split |= 1 << bit;
        }
        *word = split;

        for i in word_idx + 1..used {
            let word = self.words.get_mut(i)?;
            let next_carry = *word >> (WORD_BITS - 1);
            *word = (*word << 1) | carry;
            carry = next_carry;
        }
        self.len += 1;
        Ok(())
    }

    /// Removes and returns the bit at `idx`, shifting all bits at
    /// `(idx, len)` one place towards lower positions. The trailing word is
    /// released when the new length lands on a word boundary.
    pub fn remove(&mut self, idx: usize) -> Result<bool> {
        if idx >= self.len {
            return Err(Error::InvalidIndex);
        }
        let used = self.len.div_ceil(WORD_BITS);
        let word_idx = idx / WORD_BITS;
        let bit = idx % WORD_BITS;

        let removed = self.get(idx)?;

        // Bits above `len` are unspecified, so the topmost carry-in is zero.
        let mut carry = 0usize;
        for i in (word_idx + 1..used).rev() {
            let word = self.words.get_mut(i)?;
            let next_carry = *word & 1;
            *word = (*word >> 1) | (carry << (WORD_BITS - 1));
            carry = next_carry;
        }

        let word = self.words.get_mut(word_idx)?;
        let low = *word & ((1usize << bit) - 1);
        let high = if bit == WORD_BITS - 1 {
            0
        } else {
            (*word >> (bit + 1)) << bit
        };
        *word = low | high | (carry << (WORD_BITS - 1));

        self.len -= 1;
        let needed = self.len.div_ceil(WORD_BITS);
        while self.words.len() > needed {
            self.words.remove(self.words.len() - 1)?;
        }
        Ok(removed)
    }

    /// Counts the bits equal to `value`.
    ///
    /// Full words are counted with the hardware popcount; the tail word is
    /// masked so the unspecified bits beyond `len` never contribute.
    pub fn count(&self, value: bool) -> usize {
        let full = self.len / WORD_BITS;
        let mut ones = 0usize;
        for i in 0..full {
            // SAFETY: `i < full <= words.len()`.
            ones += unsafe { *self.words.get_unchecked(i) }.count_ones() as usize;
        }
        let tail = self.len % WORD_BITS;
        if tail != 0 {
            // SAFETY: a partial tail word exists whenever `tail != 0`.
            let word = unsafe { *self.words.get_unchecked(full) };
            ones += (word & ((1usize << tail) - 1)).count_ones() as usize;
        }
        if value {
            ones
        } else {
            self.len - ones
        }
    }

    /// Position of the lowest set bit, if any.
    pub fn first_set(&self) -> Option<usize> {
        let used = self.len.div_ceil(WORD_BITS);
        for i in 0..used {
            // SAFETY: `i < used <= words.len()`.
            let mut word = unsafe { *self.words.get_unchecked(i) };
            if i == used - 1 && self.len % WORD_BITS != 0 {
                word &= (1usize << (self.len % WORD_BITS)) - 1;
            }
            if word != 0 {
                return Some(i * WORD_BITS + word.trailing_zeros() as usize);
            }
        }
        None
    }

    /// Iterates over the positions of the set bits, in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(|&i| {
            // SAFETY: `i < len` by the range bound.
            (unsafe { *self.words.get_unchecked(i / WORD_BITS) } >> (i % WORD_BITS)) & 1 == 1
        })
    }

    /// Drops all bits without releasing backing memory.
    pub fn clear(&mut self) {
        self.words.clear();
        self.len = 0;
    }
}

impl<A: Allocator + Clone> core::fmt::Debug for Bitmap<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Bitmap[{}; ", self.len)?;
        for i in 0..self.len {
            let bit = self.get(i).map_err(|_| core::fmt::Error)?;
            write!(f, "{}", u8::from(bit))?;
        }
        write!(f, "]")
    }
}
