// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use std::num::NonZeroUsize;
use std::sync::{PoisonError, RwLock};

use rayon::{Scope, ThreadPool, ThreadPoolBuilder};

use crate::error::Result;

/// Worker count used when the hardware concurrency cannot be queried.
pub const DEFAULT_THREAD_COUNT: usize = 16;

pub fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(DEFAULT_THREAD_COUNT)
}

/// A fixed-size pool handed explicitly to the meshes that use it.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
    thread_count: usize,
}

impl WorkerPool {
    pub fn new(thread_count: usize) -> Result<Self> {
        let thread_count = thread_count.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .thread_name(|i| format!("topomesh-worker-{i}"))
            .build()?;
        Ok(Self { pool, thread_count })
    }

    /// One worker per hardware thread.
    pub fn with_default_threads() -> Result<Self> {
        Self::new(default_thread_count())
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// Runs `op` in the pool; returns once every task spawned in the scope has finished.
    pub fn scope<'scope, OP, R>(&self, op: OP) -> R
    where
        OP: FnOnce(&Scope<'scope>) -> R + Send,
        R: Send,
    {
        self.pool.scope(op)
    }
}

/// Shared result slot for a parallel search. Readers poll it, and the
/// first writer wins.
#[derive(Debug, Default)]
pub struct FoundSlot {
    inner: RwLock<Option<usize>>,
}

impl FoundSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<usize> {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores `value` unless a result is already present, and returns
    /// whichever value the slot holds afterwards.
    pub fn offer(&self, value: usize) -> usize {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard.get_or_insert(value)
    }
}
