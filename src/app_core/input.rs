//! Input events shared by the native and web runtimes.
//!
//! Crossterm and ratzilla events are translated into these before they reach
//! the reducer, so the reducer never sees a platform type.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppKeyCode {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Esc,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
}

#[derive(Debug, Clone, Copy)]
pub struct AppKeyEvent {
    pub code: AppKeyCode,
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    /// Key releases are dropped by the reducer.
    pub is_release: bool,
}

impl AppKeyEvent {
    pub fn new(code: AppKeyCode) -> Self {
        Self {
            code,
            ctrl: false,
            alt: false,
            shift: false,
            is_release: false,
        }
    }

    pub fn with_ctrl(code: AppKeyCode) -> Self {
        Self {
            ctrl: true,
            ..Self::new(code)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMouseKind {
    Move,
    LeftDown,
    ScrollUp,
    ScrollDown,
}

/// Mouse event in terminal cell coordinates. Pixel conversion, where needed,
/// is done by the runtime (see [`crate::app_core::web_mouse`]).
#[derive(Debug, Clone, Copy)]
pub struct AppMouseEvent {
    pub kind: AppMouseKind,
    pub column: u16,
    pub row: u16,
}

impl AppMouseEvent {
    pub fn new(kind: AppMouseKind, column: u16, row: u16) -> Self {
        Self { kind, column, row }
    }
}
