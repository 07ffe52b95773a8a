//! Terminal mode flags (DECSET/DECRST).

use bitflags::bitflags;

bitflags! {
    /// Bitflags for terminal mode state, toggled by `CSI ? n h` / `CSI ? n l`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TermMode: u16 {
        /// DECTCEM: cursor visible.
        const SHOW_CURSOR     = 1;
        /// DECOM: origin mode (cursor relative to scroll region).
        const ORIGIN          = 1 << 1;
        /// Modes 47/1047/1049: alternate screen buffer.
        const ALT_SCREEN      = 1 << 2;
        /// Mode 2026: synchronized output window open.
        const SYNC_UPDATE     = 1 << 3;
        /// Mode 2004: bracketed paste (tracked, no model behavior).
        const BRACKETED_PASTE = 1 << 4;
    }
}

impl Default for TermMode {
    fn default() -> Self {
        Self::SHOW_CURSOR
    }
}
