use linked_list_allocator::LockedHeap;

use flux_lib::klog_debug;

const HEAP_SIZE: usize = 8 * 1024 * 1024;

#[global_allocator]
static ALLOCATOR: LockedHeap = LockedHeap::empty();

static mut HEAP: [u8; HEAP_SIZE] = [0; HEAP_SIZE];

/// Hand the static arena to the allocator. Must run once, before the first
/// allocation.
pub fn init() {
    // SAFETY: `HEAP` is referenced nowhere else and this runs exactly once.
    unsafe {
        ALLOCATOR
            .lock()
            .init((&raw mut HEAP).cast::<u8>(), HEAP_SIZE);
    }
    klog_debug!("heap: {} KiB", HEAP_SIZE / 1024);
}
