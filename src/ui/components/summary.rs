//! Summary bar component renderer.

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SummaryInfo;

/// Renders the headline statistics on one line.
///
/// ```text
///  Counties 3,143   Avg EJI 50.2%   Avg Median AQI 39   High-Risk Counties 112
/// ```
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_summary(row: usize, summary: &SummaryInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let used = match summary {
        SummaryInfo::Loading => {
            let text = " Loading summary...";
            print!("{}{text}", Theme::fg(&theme.colors.text_dim));
            text_width(text)
        }
        SummaryInfo::Unavailable => {
            let text = " Summary unavailable";
            print!("{}{text}", Theme::fg(&theme.colors.error_fg));
            text_width(text)
        }
        SummaryInfo::Loaded(stats) => {
            let mut used = 0;
            for stat in stats {
                let label = format!(" {} ", stat.label);
                let value = format!("{}  ", stat.value);
                if used + text_width(&label) + text_width(&value) > cols {
                    break;
                }
                print!("{}{label}", Theme::fg(&theme.colors.text_dim));
                print!("{}{}{value}{}", Theme::bold(), Theme::fg(&theme.colors.accent), Theme::reset());
                used += text_width(&label) + text_width(&value);
            }
            used
        }
    };

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
