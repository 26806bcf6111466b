// Property and blit enum values from QNX SDP 7.x <screen/screen.h>
//
// Kept outside the cfg-gated backend so the table is checked on every host.

pub const SCREEN_APPLICATION_CONTEXT: i32 = 0;
pub const SCREEN_PROPERTY_BUFFER_SIZE: i32 = 5;
pub const SCREEN_PROPERTY_DISPLAY: i32 = 11;
pub const SCREEN_PROPERTY_POSITION: i32 = 35;
pub const SCREEN_PROPERTY_RENDER_BUFFERS: i32 = 37;
pub const SCREEN_PROPERTY_SIZE: i32 = 40;
pub const SCREEN_PROPERTY_TRANSPARENCY: i32 = 46;
pub const SCREEN_PROPERTY_TYPE: i32 = 47;
pub const SCREEN_PROPERTY_USAGE: i32 = 48;
pub const SCREEN_PROPERTY_RENDER_BUFFER_COUNT: i32 = 53;
pub const SCREEN_PROPERTY_ZORDER: i32 = 54;
pub const SCREEN_PROPERTY_SENSITIVITY: i32 = 57;
pub const SCREEN_PROPERTY_DISPLAY_COUNT: i32 = 59;
pub const SCREEN_PROPERTY_DISPLAYS: i32 = 60;
pub const SCREEN_PROPERTY_ID: i32 = 91;

// Fill attribute list terminator and colour key
pub const SCREEN_BLIT_END: i32 = 0;
pub const SCREEN_BLIT_COLOR: i32 = 12;
