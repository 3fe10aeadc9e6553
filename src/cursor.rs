//! Encode/decode cursor
//!
//! A [`Cursor`] is the mutable byte offset threaded through every
//! serializer during one encode or decode pass. It is exclusively owned
//! by the pass that created it; buffers are pre-sized by the
//! orchestrator, so the final position doubles as a consistency check
//! against the computed size.

/// Mutable offset into a byte buffer with get-and-advance semantics
#[derive(Debug, Default)]
pub struct Cursor {
    pos: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self { pos: 0 }
    }

    /// Current byte offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume `n` bytes: returns the pre-increment position and moves
    /// the cursor forward by `n`
    #[inline]
    pub fn advance(&mut self, n: usize) -> usize {
        let prev = self.pos;
        self.pos += n;
        prev
    }
}
