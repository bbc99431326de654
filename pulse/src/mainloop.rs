// SPDX-FileCopyrightText: 2025 Contributors to the pulse-sink project.
// SPDX-License-Identifier: Apache-2.0

//! Threaded mainloop ownership and locking.
//!
//! libpulse runs its event loop on a thread of its own. Every call into a
//! context or stream must happen with the loop locked, and waiting for a state
//! change means releasing the lock until a callback signals the loop. This
//! module encodes that discipline in types:
//!
//! - [`ThreadedMainloop`] owns the loop and stops and frees it when the last
//!   clone is dropped.
//! - [`MainloopGuard`] is proof that the lock is held. Functions that touch
//!   libpulse objects take a guard, and the lock is released when the guard
//!   goes out of scope.
//!
//! Callbacks registered by this crate never run user code. They only signal
//! the loop so that a thread blocked in [`MainloopGuard::wait`] wakes up and
//! re-checks whatever state it was waiting for.

use std::{
    ffi::c_void,
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use crate::{Error, Result, api::PulseApiHandle};

/// Shared state behind a [`ThreadedMainloop`].
///
/// Its heap address is stable for the lifetime of the `Arc`, so it doubles as
/// the userdata pointer handed to libpulse callbacks.
pub(crate) struct MainloopInner {
    pub(crate) api: PulseApiHandle,
    pub(crate) ptr: *mut pulse_sys::ThreadedMainloop,
    running: AtomicBool,
}

// Safety: the pointer is only dereferenced by libpulse, and the threaded
// mainloop API is designed to be driven from any thread.
unsafe impl Send for MainloopInner {}
unsafe impl Sync for MainloopInner {}

impl MainloopInner {
    /// Userdata pointer for callbacks that only signal the loop.
    pub(crate) fn as_userdata(self: &Arc<Self>) -> *mut c_void {
        Arc::as_ptr(self) as *mut c_void
    }
}

impl Drop for MainloopInner {
    fn drop(&mut self) {
        if self.running.swap(false, Ordering::AcqRel) {
            unsafe { self.api.threaded_mainloop_stop(self.ptr) };
        }
        unsafe { self.api.threaded_mainloop_free(self.ptr) };
    }
}

/// Wakes every thread blocked in [`MainloopGuard::wait`].
///
/// # Safety
///
/// `userdata` must come from [`MainloopInner::as_userdata`] and the mainloop
/// must still be alive. libpulse only invokes callbacks from the loop thread
/// with the lock held, which is what `pa_threaded_mainloop_signal` requires.
pub(crate) unsafe fn signal_from_callback(userdata: *mut c_void) {
    if userdata.is_null() {
        return;
    }
    let inner = unsafe { &*(userdata as *const MainloopInner) };
    unsafe { inner.api.threaded_mainloop_signal(inner.ptr, 0) };
}

/// An owned libpulse threaded mainloop.
///
/// Cloning is cheap and shares the same loop. Contexts and streams keep a
/// clone, so the loop outlives every object that was created on it.
#[derive(Clone)]
pub struct ThreadedMainloop {
    pub(crate) inner: Arc<MainloopInner>,
}

impl ThreadedMainloop {
    /// Creates a new mainloop. The loop thread is not running until
    /// [`ThreadedMainloop::start`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Other`] if libpulse fails to allocate the loop.
    pub fn new(api: PulseApiHandle) -> Result<Self> {
        let ptr = unsafe { api.threaded_mainloop_new() };
        if ptr.is_null() {
            return Err(Error::Other("Failed to allocate mainloop.".to_string()));
        }
        Ok(Self {
            inner: Arc::new(MainloopInner {
                api,
                ptr,
                running: AtomicBool::new(false),
            }),
        })
    }

    /// Starts the event loop thread.
    ///
    /// # Errors
    ///
    /// Returns an error if libpulse cannot spawn the thread.
    pub fn start(&self) -> Result<()> {
        let ret = unsafe { self.inner.api.threaded_mainloop_start(self.inner.ptr) };
        Error::from_code(ret)?;
        self.inner.running.store(true, Ordering::Release);
        tracing::trace!("Mainloop started");
        Ok(())
    }

    /// Stops the event loop thread and joins it.
    ///
    /// Must not be called with the lock held or from the loop thread.
    pub fn stop(&self) {
        if self.inner.running.swap(false, Ordering::AcqRel) {
            unsafe { self.inner.api.threaded_mainloop_stop(self.inner.ptr) };
            tracing::trace!("Mainloop stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Locks the loop. The lock is released when the guard is dropped.
    ///
    /// The lock is recursive in libpulse, but must not be taken from inside a
    /// callback running on the loop thread.
    pub fn lock(&self) -> MainloopGuard<'_> {
        unsafe { self.inner.api.threaded_mainloop_lock(self.inner.ptr) };
        MainloopGuard {
            mainloop: self,
            _not_send: PhantomData,
        }
    }

    /// Returns `true` when called from the event loop thread itself.
    pub fn in_thread(&self) -> bool {
        unsafe { self.inner.api.threaded_mainloop_in_thread(self.inner.ptr) != 0 }
    }

    /// The library this loop was created from.
    pub fn api(&self) -> &PulseApiHandle {
        &self.inner.api
    }

    pub(crate) fn same_as(&self, other: &ThreadedMainloop) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Proof that the mainloop lock is held.
///
/// The guard is neither `Send` nor `Sync`: the lock must be released on the
/// thread that took it.
pub struct MainloopGuard<'a> {
    mainloop: &'a ThreadedMainloop,
    _not_send: PhantomData<*const ()>,
}

impl MainloopGuard<'_> {
    /// Releases the lock until a callback signals the loop, then re-acquires it.
    ///
    /// Wake-ups can be spurious, so callers loop on the condition they wait for.
    pub fn wait(&self) {
        let inner = &self.mainloop.inner;
        unsafe { inner.api.threaded_mainloop_wait(inner.ptr) };
    }

    /// Wakes threads blocked in [`MainloopGuard::wait`].
    pub fn signal(&self) {
        let inner = &self.mainloop.inner;
        unsafe { inner.api.threaded_mainloop_signal(inner.ptr, 0) };
    }

    /// The mainloop this guard locks.
    pub fn mainloop(&self) -> &ThreadedMainloop {
        self.mainloop
    }

    pub(crate) fn api(&self) -> &PulseApiHandle {
        &self.mainloop.inner.api
    }

    pub(crate) fn locks(&self, mainloop: &ThreadedMainloop) -> bool {
        self.mainloop.same_as(mainloop)
    }
}

impl Drop for MainloopGuard<'_> {
    fn drop(&mut self) {
        let inner = &self.mainloop.inner;
        unsafe { inner.api.threaded_mainloop_unlock(inner.ptr) };
    }
}
