use flux_abi::draw::Color32;

// Window metrics
pub const TITLE_BAR_HEIGHT: i32 = 24;
pub const RESIZE_MARGIN: i32 = 8;
pub const GLYPH_SIZE: i32 = 16;
pub const GLYPH_TOP: i32 = 4;
/// Distance from the window's right edge to the close glyph's left edge.
pub const CLOSE_GLYPH_INSET: i32 = 20;
/// Horizontal step between neighbouring title-bar glyphs.
pub const GLYPH_STEP: i32 = 20;
pub const TITLE_TEXT_X: i32 = 4;
pub const TITLE_TEXT_Y: i32 = 6;
pub const MIN_WINDOW_WIDTH: i32 = 100;
pub const MIN_WINDOW_HEIGHT: i32 = 60;
pub const MAX_WINDOWS: usize = 64;

// Taskbar metrics
pub const TASKBAR_HEIGHT: i32 = 32;
pub const TASKBAR_BUTTON_TOP: i32 = 4;
pub const TASKBAR_BUTTON_HEIGHT: i32 = 24;
pub const START_BUTTON_X: i32 = 5;
pub const START_BUTTON_WIDTH: i32 = 70;
pub const APP_BUTTON_WIDTH: i32 = 120;
pub const APP_BUTTON_GAP: i32 = 4;
pub const CLOCK_TEXT_INSET: i32 = 90;
pub const CLOCK_BOX_WIDTH: i32 = 85;
pub const CLOCK_BOX_HEIGHT: i32 = 18;
pub const START_MENU_WIDTH: i32 = 180;
pub const START_MENU_ITEM_HEIGHT: i32 = 24;
pub const START_MENU_PADDING: i32 = 6;

// Colors
pub const COLOR_TITLE_BAR: Color32 = Color32(0xFF2A_5F7F);
pub const COLOR_TASKBAR: Color32 = Color32(0xFF1A_4D6D);
pub const COLOR_DESKTOP: Color32 = Color32(0xFF0D_3D52);
pub const COLOR_WINDOW_BG: Color32 = Color32(0xFFE0_E0E0);
pub const COLOR_BUTTON: Color32 = Color32(0xFFD0_D0D0);
pub const COLOR_BUTTON_HOVER: Color32 = Color32(0xFFE8_E8E8);
pub const COLOR_BORDER: Color32 = Color32(0xFF80_8080);
pub const COLOR_LIGHT_GRAY: Color32 = Color32(0xFFC0_C0C0);
pub const COLOR_DARK_GRAY: Color32 = Color32(0xFF40_4040);
pub const COLOR_WHITE: Color32 = Color32::WHITE;
pub const COLOR_BLACK: Color32 = Color32::BLACK;
pub const COLOR_RED: Color32 = Color32(0xFFFF_0000);
