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

use std::sync::Arc;

use topomesh::util::{CancelToken, FoundSlot, ProgressTask, ProgressTracker, WorkerPool};

#[test]
fn test_found_slot_first_writer_wins() {
    let slot = FoundSlot::new();
    assert_eq!(slot.get(), None);
    assert_eq!(slot.offer(7), 7);
    assert_eq!(slot.offer(3), 7);
    assert_eq!(slot.get(), Some(7));
}

#[test]
fn test_found_slot_shared_across_workers() {
    let pool = WorkerPool::new(4).unwrap();
    let slot = FoundSlot::new();
    pool.scope(|scope| {
        for i in 0..16 {
            let slot = &slot;
            scope.spawn(move |_| {
                slot.offer(i);
            });
        }
    });
    let winner = slot.get().expect("some worker wrote first");
    assert!(winner < 16);
    assert_eq!(slot.offer(99), winner);
}

#[test]
fn test_worker_pool_thread_count() {
    let pool = WorkerPool::new(3).unwrap();
    assert_eq!(pool.thread_count(), 3);
    let pool = WorkerPool::new(0).unwrap();
    assert_eq!(pool.thread_count(), 1);
    let pool = Arc::new(WorkerPool::with_default_threads().unwrap());
    assert!(pool.thread_count() >= 1);
}

#[test]
fn test_cancel_token_is_shared() {
    let token = CancelToken::new();
    let tracker = ProgressTracker::with_cancel(token.clone());
    assert!(!tracker.is_cancelled());
    token.cancel();
    assert!(tracker.is_cancelled());
}

#[test]
fn test_progress_tracker_clamps() {
    let mut tracker = ProgressTracker::new();
    tracker.set_value_and_update(0.4);
    assert_eq!(tracker.value(), 0.4);
    tracker.set_value_and_update(1.7);
    assert_eq!(tracker.value(), 1.0);
    assert_eq!(tracker.update_count(), 2);
}
