use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut};

use spin::{Mutex, MutexGuard};

/// Spin lock that also masks interrupts while held.
///
/// Data shared between an interrupt handler and the main loop must be
/// behind one of these: a handler that fires while the loop holds a plain
/// spin lock would spin forever. On hosted targets there are no interrupts
/// to mask and the type degrades to a plain `spin::Mutex`.
pub struct IrqMutex<T> {
    inner: Mutex<T>,
}

pub struct IrqMutexGuard<'a, T> {
    guard: ManuallyDrop<MutexGuard<'a, T>>,
    restore_interrupts: bool,
}

impl<T> IrqMutex<T> {
    pub const fn new(data: T) -> Self {
        Self {
            inner: Mutex::new(data),
        }
    }

    pub fn lock(&self) -> IrqMutexGuard<'_, T> {
        let restore_interrupts = irq_save();
        IrqMutexGuard {
            guard: ManuallyDrop::new(self.inner.lock()),
            restore_interrupts,
        }
    }

    /// Run `f` with the lock held.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        f(&mut guard)
    }

    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T> Deref for IrqMutexGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.guard
    }
}

impl<T> DerefMut for IrqMutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.guard
    }
}

impl<T> Drop for IrqMutexGuard<'_, T> {
    fn drop(&mut self) {
        // Unlock before interrupts come back on.
        // SAFETY: the guard is dropped exactly once, here.
        unsafe { ManuallyDrop::drop(&mut self.guard) };
        irq_restore(self.restore_interrupts);
    }
}

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
fn irq_save() -> bool {
    use x86_64::instructions::interrupts;
    let were_enabled = interrupts::are_enabled();
    if were_enabled {
        interrupts::disable();
    }
    were_enabled
}

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
fn irq_restore(were_enabled: bool) {
    if were_enabled {
        x86_64::instructions::interrupts::enable();
    }
}

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
fn irq_save() -> bool {
    false
}

#[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
fn irq_restore(_were_enabled: bool) {}
