use core::cell::{RefCell, RefMut};
use core::fmt;
use core::ops::Deref;
use core::ops::DerefMut;

use cortex_m::interrupt::CriticalSection;

/// A "lock" based on critical sections.
///
/// Wrap a whole [`Mcp4725`](crate::Mcp4725) in it to share the driver between
/// the main loop and interrupt handlers. Every operation then runs inside one
/// critical section, so an EEPROM poll and the write that follows can't be
/// split by other traffic.
///
/// ```ignore
/// static DAC: Lock<Option<Mcp4725<I2c>>> = Lock::new(None);
///
/// cortex_m::interrupt::free(|cs| {
///     if let Some(dac) = DAC.get(cs).as_mut() {
///         dac.write(0.5).ok();
///     }
/// });
/// ```
///
/// # Safety
///
/// * The lock is only safe on single-core systems.
/// * Access is exclusive because it only happens inside a critical section.
///
/// # Panics
///
/// Taking it twice inside the same critical section panics.
pub struct Lock<T> {
    inner: RefCell<T>,
}

// Same reasoning as `cortex_m::interrupt::Mutex`: the data is only reached
// through `get`, which needs a critical section.
unsafe impl<T: Send> Sync for Lock<T> {}

pub struct LockGuard<'a, T> {
    data: RefMut<'a, T>,
}

impl<T> Lock<T> {
    /// Create a new instance of a lock.
    pub const fn new(t: T) -> Self {
        Lock {
            inner: RefCell::new(t),
        }
    }

    /// Get the data for the duration of the critical section.
    pub fn get<'c>(&'c self, _cs: &'c CriticalSection) -> LockGuard<'c, T> {
        LockGuard {
            data: self.inner.borrow_mut(),
        }
    }

    /// Take the data back out, e.g. to release the bus of a driver.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<'a, T> Deref for LockGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<'a, T> DerefMut for LockGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<T: fmt::Debug> fmt::Debug for LockGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: fmt::Display> fmt::Display for LockGuard<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (**self).fmt(f)
    }
}
