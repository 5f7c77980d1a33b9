use core::fmt;

use flux_abi::{DisplayInfo, PixelFormat};
use flux_lib::{IrqMutex, klog_debug, klog_warn};

const MIN_FRAMEBUFFER_WIDTH: u32 = 320;
const MIN_FRAMEBUFFER_HEIGHT: u32 = 240;
const MAX_BUFFER_SIZE: u64 = 64 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoError {
    NullAddress,
    UnsupportedDepth(u16),
    DimensionsOutOfRange,
    BufferTooLarge,
    /// [`init`] has not accepted a framebuffer yet.
    NoFramebuffer,
}

impl fmt::Display for VideoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullAddress => write!(f, "framebuffer address is null"),
            Self::UnsupportedDepth(bpp) => write!(f, "unsupported depth of {} bits", bpp),
            Self::DimensionsOutOfRange => write!(f, "framebuffer dimensions out of range"),
            Self::BufferTooLarge => write!(f, "framebuffer larger than 64 MiB"),
            Self::NoFramebuffer => write!(f, "no framebuffer initialised"),
        }
    }
}

pub type VideoResult<T = ()> = Result<T, VideoError>;

/// Validated framebuffer geometry plus its base address.
///
/// The address is kept as an integer so the state can live in a static.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FbState {
    pub(crate) base: usize,
    pub(crate) info: DisplayInfo,
}

impl FbState {
    #[inline]
    pub fn info(&self) -> DisplayInfo {
        self.info
    }

    #[inline]
    pub(crate) fn base_ptr(&self) -> *mut u8 {
        self.base as *mut u8
    }

    #[inline]
    pub(crate) fn buffer_size(&self) -> usize {
        self.info.buffer_size() as usize
    }
}

static FRAMEBUFFER: IrqMutex<Option<FbState>> = IrqMutex::new(None);

/// Check bootloader-provided framebuffer fields and turn them into
/// [`DisplayInfo`].
pub fn validate(addr: u64, width: u64, height: u64, pitch: u64, bpp: u16) -> VideoResult<FbState> {
    if addr == 0 {
        return Err(VideoError::NullAddress);
    }
    let format = PixelFormat::from_depth(bpp).ok_or(VideoError::UnsupportedDepth(bpp))?;

    let dims = (
        u32::try_from(width).ok(),
        u32::try_from(height).ok(),
        u32::try_from(pitch).ok(),
    );
    let (Some(width), Some(height), Some(pitch)) = dims else {
        return Err(VideoError::DimensionsOutOfRange);
    };
    if !(MIN_FRAMEBUFFER_WIDTH..=DisplayInfo::MAX_DIMENSION).contains(&width)
        || !(MIN_FRAMEBUFFER_HEIGHT..=DisplayInfo::MAX_DIMENSION).contains(&height)
    {
        return Err(VideoError::DimensionsOutOfRange);
    }
    if (pitch as u64) < width as u64 * format.bytes_per_pixel() as u64 {
        return Err(VideoError::DimensionsOutOfRange);
    }

    let info = DisplayInfo::new(width, height, pitch, format);
    if info.buffer_size() > MAX_BUFFER_SIZE {
        return Err(VideoError::BufferTooLarge);
    }
    let base = usize::try_from(addr).map_err(|_| VideoError::NullAddress)?;
    Ok(FbState { base, info })
}

/// Accept the framebuffer for the rest of the boot.
///
/// # Safety
/// `address` must point at `pitch * height` bytes of writable memory that
/// stays mapped for the lifetime of the kernel.
pub unsafe fn init(
    address: *mut u8,
    width: u64,
    height: u64,
    pitch: u64,
    bpp: u16,
) -> VideoResult<DisplayInfo> {
    match validate(address as u64, width, height, pitch, bpp) {
        Ok(fb) => {
            klog_debug!(
                "video: framebuffer at {:#x} {}x{} pitch={} bpp={}",
                fb.base,
                fb.info.width,
                fb.info.height,
                fb.info.pitch,
                bpp
            );
            *FRAMEBUFFER.lock() = Some(fb);
            Ok(fb.info)
        }
        Err(err) => {
            klog_warn!(
                "video: rejected framebuffer {}x{} pitch={} bpp={}: {}",
                width,
                height,
                pitch,
                bpp,
                err
            );
            Err(err)
        }
    }
}

pub fn display_info() -> Option<DisplayInfo> {
    FRAMEBUFFER.lock().map(|fb| fb.info)
}

pub fn is_initialized() -> bool {
    FRAMEBUFFER.lock().is_some()
}

pub(crate) fn snapshot() -> VideoResult<FbState> {
    FRAMEBUFFER.lock().ok_or(VideoError::NoFramebuffer)
}
