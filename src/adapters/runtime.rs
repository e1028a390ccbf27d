//! Link-time symbols that `critical-section` and `embassy-time` expect
//! the platform to provide.
//!
//! The receive slots are `embassy-sync` channels, which take a critical
//! section on every post and take. On ESP-IDF that is a process-wide
//! re-entrant lock. Nothing in the firmware awaits a timer, so wakes fire
//! immediately.

use std::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::time::uptime_us;

static SECTION_LOCK: Mutex<()> = Mutex::new(());

thread_local! {
    static DEPTH: Cell<u8> = const { Cell::new(0) };
    static HELD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    DEPTH.with(|depth| {
        let d = depth.get();
        if d == 0 {
            // The guarded data is `()`, a poisoned lock is still usable.
            let guard = SECTION_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
            HELD.with(|held| *held.borrow_mut() = Some(guard));
        }
        let d = d.saturating_add(1);
        depth.set(d);
        d
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_token: u8) {
    DEPTH.with(|depth| {
        let d = depth.get();
        if d == 0 {
            return;
        }
        depth.set(d - 1);
        if d == 1 {
            HELD.with(|held| *held.borrow_mut() = None);
        }
    });
}

#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    uptime_us()
}

#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(_at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }
    // SAFETY: embassy-time passes a pointer to a live `Waker` for the
    // duration of this call.
    let waker = unsafe { &*(waker as *const core::task::Waker) };
    waker.wake_by_ref();
}
