//! Horizontal option strip for in-screen filters (status, severity, type).

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use strum::IntoEnumIterator;

use crate::theme;

/// A `label: [active]  other  other` line. `active_index` past the end
/// highlights nothing.
pub fn render_sub_tabs<'a>(label: &'a str, options: &[&'a str], active_index: usize) -> Line<'a> {
    let mut spans = Vec::with_capacity(options.len() * 2 + 1);
    spans.push(Span::styled(format!("{label}: "), theme::key_hint()));

    for (i, option) in options.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if i == active_index {
            spans.push(Span::styled(
                format!("[{option}]"),
                theme::tab_active().add_modifier(Modifier::UNDERLINED),
            ));
        } else {
            spans.push(Span::styled(*option, theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

/// Step an optional enum filter: `None` → first variant → … → last → `None`.
pub fn cycle_option<T: IntoEnumIterator + PartialEq + Copy>(current: Option<T>) -> Option<T> {
    match current {
        None => T::iter().next(),
        Some(value) => T::iter().skip_while(|v| *v != value).nth(1),
    }
}

/// Position of an optional filter in an `All, variants…` strip.
pub fn option_index<T: IntoEnumIterator + PartialEq + Copy>(current: Option<T>) -> usize {
    current
        .and_then(|value| T::iter().position(|v| v == value))
        .map_or(0, |i| i + 1)
}
