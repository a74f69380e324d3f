use log::trace;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

/// Pool of reusable byte buffers for request body serialization.
///
/// Each caller gets an exclusive buffer; it is cleared on hand-out and given
/// back to the pool when the guard is dropped, whatever the outcome of the
/// call. Oversized buffers are dropped instead of being kept around.
#[derive(Debug)]
pub struct BufferPool {
    buffers: Mutex<Vec<Vec<u8>>>,
    max_idle: usize,
    max_capacity: usize,
}

impl BufferPool {
    pub const DEFAULT_MAX_IDLE: usize = 16;
    pub const DEFAULT_MAX_CAPACITY: usize = 64 * 1024;

    pub fn new() -> Self {
        Self::with_limits(Self::DEFAULT_MAX_IDLE, Self::DEFAULT_MAX_CAPACITY)
    }

    /// Create a pool keeping at most `max_idle` buffers of at most `max_capacity` bytes
    pub fn with_limits(max_idle: usize, max_capacity: usize) -> Self {
        Self {
            buffers: Mutex::new(Vec::new()),
            max_idle,
            max_capacity,
        }
    }

    /// Take an empty buffer out of the pool, allocating one if none is idle
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let mut buf = self
            .buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_default();
        buf.clear();
        PooledBuffer { pool: self, buf }
    }

    /// Number of buffers currently waiting in the pool
    pub fn idle(&self) -> usize {
        self.buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn release(&self, mut buf: Vec<u8>) {
        if buf.capacity() > self.max_capacity {
            trace!("Dropping oversized pooled buffer ({} bytes)", buf.capacity());
            return;
        }
        buf.clear();

        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        if buffers.len() < self.max_idle {
            buffers.push(buf);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive buffer borrowed from a [`BufferPool`]
#[derive(Debug)]
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Vec<u8>,
}

impl Deref for PooledBuffer<'_> {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}
