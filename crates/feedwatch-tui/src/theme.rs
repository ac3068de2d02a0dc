//! SilkCircuit palettes and semantic styling for the TUI.
//!
//! Two palettes share one set of roles. The dark one paints its own panel
//! backgrounds; the light one (also used for `auto`) leaves the terminal
//! background alone and uses deeper accents that read on white.

use std::sync::atomic::{AtomicBool, Ordering};

use ratatui::style::{Color, Modifier, Style};

use feedwatch_config::Theme;
use feedwatch_core::{FeedStatus, Severity};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub accent: Color,
    pub highlight: Color,
    pub coral: Color,
    pub warning: Color,
    pub success: Color,
    pub error: Color,
    pub text: Color,
    pub muted: Color,
    pub panel_bg: Color,
    pub selected_bg: Color,
}

pub const DARK: Palette = Palette {
    accent: Color::Rgb(225, 53, 255),      // #e135ff
    highlight: Color::Rgb(128, 255, 234),  // #80ffea
    coral: Color::Rgb(255, 106, 193),      // #ff6ac1
    warning: Color::Rgb(241, 250, 140),    // #f1fa8c
    success: Color::Rgb(80, 250, 123),     // #50fa7b
    error: Color::Rgb(255, 99, 99),        // #ff6363
    text: Color::Rgb(189, 193, 207),       // #bdc1cf
    muted: Color::Rgb(98, 114, 164),       // #6272a4
    panel_bg: Color::Rgb(30, 31, 41),      // #1e1f29
    selected_bg: Color::Rgb(40, 42, 54),   // #282a36
};

pub const LIGHT: Palette = Palette {
    accent: Color::Rgb(138, 43, 226),      // #8a2be2
    highlight: Color::Rgb(0, 128, 128),    // #008080
    coral: Color::Rgb(199, 21, 133),       // #c71585
    warning: Color::Rgb(184, 134, 11),     // #b8860b
    success: Color::Rgb(34, 139, 34),      // #228b22
    error: Color::Rgb(200, 30, 30),        // #c81e1e
    text: Color::Reset,
    muted: Color::Rgb(112, 128, 144),      // #708090
    panel_bg: Color::Reset,
    selected_bg: Color::Rgb(230, 230, 250), // #e6e6fa
};

static USE_LIGHT: AtomicBool = AtomicBool::new(true);

/// Switch the active palette.
pub fn apply(theme: Theme) {
    USE_LIGHT.store(!matches!(theme, Theme::Dark), Ordering::Relaxed);
}

pub fn palette() -> &'static Palette {
    if USE_LIGHT.load(Ordering::Relaxed) {
        &LIGHT
    } else {
        &DARK
    }
}

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default()
        .fg(palette().highlight)
        .add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(palette().accent)
}

pub fn border_default() -> Style {
    Style::default().fg(palette().muted)
}

pub fn table_header() -> Style {
    Style::default()
        .fg(palette().highlight)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

pub fn table_row() -> Style {
    Style::default().fg(palette().text)
}

pub fn table_selected() -> Style {
    Style::default()
        .fg(palette().accent)
        .bg(palette().selected_bg)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_active() -> Style {
    Style::default()
        .fg(palette().accent)
        .add_modifier(Modifier::BOLD)
}

pub fn tab_inactive() -> Style {
    Style::default().fg(palette().text)
}

/// Background for popups and overlays.
pub fn overlay() -> Style {
    Style::default().bg(palette().panel_bg)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(palette().muted)
}

pub fn key_hint_key() -> Style {
    Style::default()
        .fg(palette().highlight)
        .add_modifier(Modifier::BOLD)
}

pub fn error_banner() -> Style {
    Style::default()
        .fg(palette().error)
        .add_modifier(Modifier::BOLD)
}

pub fn severity(severity: Severity) -> Style {
    let p = palette();
    match severity {
        Severity::Critical => Style::default().fg(p.error).add_modifier(Modifier::BOLD),
        Severity::High => Style::default().fg(p.coral),
        Severity::Medium => Style::default().fg(p.warning),
        Severity::Low => Style::default().fg(p.muted),
    }
}

pub fn feed_status(status: FeedStatus) -> Style {
    let p = palette();
    match status {
        FeedStatus::Active => Style::default().fg(p.success),
        FeedStatus::Error => Style::default().fg(p.error).add_modifier(Modifier::BOLD),
        FeedStatus::Pending => Style::default().fg(p.warning),
        FeedStatus::Inactive => Style::default().fg(p.muted),
    }
}
