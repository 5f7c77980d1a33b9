#![no_std]
#![no_main]
#![forbid(unsafe_op_in_unsafe_fn)]

extern crate alloc;

mod heap;
mod serial;

use core::panic::PanicInfo;

use flux_abi::DisplayInfo;
use flux_drivers::ps2::{self, PortController};
use flux_drivers::rtc::{CmosClock, CmosPorts};
use flux_gui::{GuiConfig, GuiState, SharedEventQueue};
use flux_lib::{OverflowPolicy, klog_error, klog_info, klog_warn};
use flux_video::{GraphicsContext, VideoError, VideoResult};
use limine::BaseRevision;
use limine::request::FramebufferRequest;

#[used]
#[unsafe(link_section = ".limine_requests_start_marker")]
static LIMINE_REQUESTS_START_MARKER: [u64; 1] = [0];

#[used]
#[unsafe(link_section = ".limine_requests")]
static BASE_REVISION: BaseRevision = BaseRevision::new();

#[used]
#[unsafe(link_section = ".limine_requests")]
static FRAMEBUFFER_REQUEST: FramebufferRequest = FramebufferRequest::new();

#[used]
#[unsafe(link_section = ".limine_requests_end_marker")]
static LIMINE_REQUESTS_END_MARKER: [u64; 1] = [0];

/// Events raised outside the main loop; drained into the desktop queue once
/// per pass.
static EXTERNAL_EVENTS: SharedEventQueue = SharedEventQueue::new(OverflowPolicy::DropNewest);

#[unsafe(no_mangle)]
extern "C" fn kmain() -> ! {
    serial::init();
    heap::init();
    klog_info!("flux: booting");

    if !BASE_REVISION.is_supported() {
        klog_error!("flux: bootloader does not support the requested Limine revision");
        halt();
    }

    let info = match init_video() {
        Ok(info) => info,
        Err(err) => {
            klog_error!("video: {}", err);
            halt();
        }
    };
    let mut canvas = match GraphicsContext::new() {
        Ok(canvas) => canvas,
        Err(err) => {
            klog_error!("video: {}", err);
            halt();
        }
    };

    // SAFETY: the desktop loop is the only user of ports 0x60/0x64.
    let mut controller = unsafe { PortController::new() };
    match ps2::init_controller(&mut controller).and_then(|()| ps2::enable_mouse(&mut controller)) {
        Ok(()) => klog_info!("ps2: keyboard and mouse ready"),
        Err(err) => klog_warn!("ps2: {}; continuing without a mouse", err),
    }

    // SAFETY: nothing else reads the CMOS.
    let mut clock = CmosClock::new(unsafe { CmosPorts::new() });

    let config = GuiConfig::default();
    let mut delay = config.loop_delay();
    let mut gui = GuiState::new(info.width, info.height, config);
    gui.attach_shared(&EXTERNAL_EVENTS);
    gui.run(&mut controller, &mut clock, &mut canvas, &mut delay);

    klog_info!("flux: desktop stopped, halting");
    halt();
}

fn init_video() -> VideoResult<DisplayInfo> {
    let fb = FRAMEBUFFER_REQUEST
        .get_response()
        .and_then(|resp| resp.framebuffers().next())
        .ok_or(VideoError::NoFramebuffer)?;
    // SAFETY: Limine maps the framebuffer for the lifetime of the kernel.
    unsafe {
        flux_video::framebuffer::init(fb.addr(), fb.width(), fb.height(), fb.pitch(), fb.bpp())
    }
}

fn halt() -> ! {
    x86_64::instructions::interrupts::disable();
    loop {
        x86_64::instructions::hlt();
    }
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    klog_error!("PANIC: {}", info.message());
    let location = info.location().map(|loc| (loc.file(), loc.line()));
    if let Some((file, line)) = location {
        klog_error!("  at {}:{}", file, line);
    }
    flux_video::display_panic_screen(Some(&info.message()), location);
    halt();
}
