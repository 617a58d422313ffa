/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! A bounded, thread-local free list for the float registry's backing
//! storage. Layout creates and discards managers densely while descending
//! the block tree; recycling the registry allocation keeps that churn off the
//! allocator. Purely an allocation optimization, with no observable effect
//! on manager semantics.

use std::cell::RefCell;
use std::mem;

use crate::manager::FloatInfo;

const CACHE_SIZE: usize = 4;

struct StorageCache {
    buffers: Vec<Vec<FloatInfo>>,
    shut_down: bool,
}

thread_local! {
    static CACHE: RefCell<StorageCache> = RefCell::new(StorageCache {
        buffers: Vec::new(),
        shut_down: false,
    });
}

/// Takes a recycled registry buffer, or a fresh one if the cache is empty.
pub(crate) fn take_registry_storage() -> Vec<FloatInfo> {
    CACHE.with(|cache| cache.borrow_mut().buffers.pop().unwrap_or_default())
}

/// Returns a registry buffer to the cache. Dropped on the floor after
/// shutdown, when the cache is full, or when there is no allocation worth
/// keeping.
pub(crate) fn return_registry_storage(mut buffer: Vec<FloatInfo>) {
    buffer.clear();
    if buffer.capacity() == 0 {
        return;
    }
    CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if !cache.shut_down && cache.buffers.len() < CACHE_SIZE {
            cache.buffers.push(buffer);
        }
    });
}

/// Drains this thread's cache and refuses further caching. Called at module
/// shutdown.
pub fn shutdown() {
    CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        cache.shut_down = true;
        mem::take(&mut cache.buffers);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recycles_up_to_capacity() {
        for _ in 0..(CACHE_SIZE + 2) {
            let mut buffer = Vec::new();
            buffer.reserve(8);
            return_registry_storage(buffer);
        }
        let cached = CACHE.with(|cache| cache.borrow().buffers.len());
        assert!(cached <= CACHE_SIZE);
    }
}
