//! Map panel component renderer.
//!
//! The terminal cannot draw county shapes, so the panel reports on the
//! current choropleth render instead: its title, progress, a colour-scale
//! preview with the plotted value range, and the mode's legend.

use crate::domain::county::{format_number, format_thousands};
use crate::ui::helpers::{clip, position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{MapPanelBody, MapPanelInfo, MapStats};

/// Renders the three-line map panel.
///
/// # Layout
///
/// ```text
///  Map: Environmental Justice Index (Percentile)
///    ▇▇▇▇▇▇▇▇▇▇▇▇▇▇▇▇  12.3 - 99.9   3,104 counties plotted
///    Red = Higher environmental justice concerns (worse). ...
/// ```
///
/// # Returns
///
/// The next available row position (row + 3)
pub fn render_map_panel(row: usize, map: &MapPanelInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    let title = clip(&format!(" Map: {}", map.title), cols);
    print!("{}{}{title}", Theme::bold(), Theme::fg(&theme.colors.header_fg));
    print!("{}{}", " ".repeat(cols.saturating_sub(text_width(&title))), Theme::reset());

    position_cursor(row + 1, 1);
    let used = match &map.body {
        MapPanelBody::Waiting => print_line(&theme.colors.text_dim, "   Waiting for county and EJI data...", cols),
        MapPanelBody::Loading { plotted } => print_line(
            &theme.colors.text_dim,
            &format!(
                "   Loading county boundaries... ({} counties ready)",
                format_thousands(*plotted as u64)
            ),
            cols,
        ),
        MapPanelBody::Ready(stats) => render_stats(stats, theme, cols),
        MapPanelBody::Error { heading, detail } => {
            let heading = clip(&format!("   {heading}: "), cols);
            print!("{}{}{heading}{}", Theme::bold(), Theme::fg(&theme.colors.error_fg), Theme::reset());
            text_width(&heading) + print_line(&theme.colors.error_fg, detail, cols.saturating_sub(text_width(&heading)))
        }
    };
    print!("{}{}", " ".repeat(cols.saturating_sub(used)), Theme::reset());

    position_cursor(row + 2, 1);
    let used = print_line(&theme.colors.text_dim, &format!("   {}", map.legend), cols);
    print!("{}{}", " ".repeat(cols.saturating_sub(used)), Theme::reset());

    row + 3
}

/// Prints `text` clipped to `width` in `color`, returning the cells used.
fn print_line(color: &str, text: &str, width: usize) -> usize {
    let text = clip(text, width);
    print!("{}{text}", Theme::fg(color));
    text_width(&text)
}

fn render_stats(stats: &MapStats, theme: &Theme, cols: usize) -> usize {
    print!("   ");
    for &rgb in &stats.swatches {
        print!("{} ", Theme::bg_rgb(rgb));
    }
    print!("{}", Theme::reset());
    let mut used = 3 + stats.swatches.len();

    let mut text = match stats.range {
        Some((lo, hi)) => format!("  {} - {}   ", format_number(lo), format_number(hi)),
        None => "   ".to_string(),
    };
    text.push_str(&format!("{} counties plotted", format_thousands(stats.plotted as u64)));
    if stats.unmatched > 0 {
        text.push_str(&format!(", {} without boundary", format_thousands(stats.unmatched as u64)));
    }

    used += print_line(&theme.colors.text_normal, &text, cols.saturating_sub(used));
    used
}
