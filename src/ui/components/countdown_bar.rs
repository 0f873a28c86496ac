use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Time left on the current question; turns to warning colours near the end.
pub struct CountdownBar<'a> {
    pub ratio: f64,
    pub remaining: Duration,
    pub theme: &'a Theme,
}

impl<'a> CountdownBar<'a> {
    pub fn new(ratio: f64, remaining: Duration, theme: &'a Theme) -> Self {
        Self {
            ratio: ratio.clamp(0.0, 1.0),
            remaining,
            theme,
        }
    }
}

impl Widget for CountdownBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Time ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let fill = if self.ratio > 0.5 {
            colors.bar_filled()
        } else if self.ratio > 0.2 {
            colors.warning()
        } else {
            colors.error()
        };
        let filled_width = (self.ratio * inner.width as f64) as u16;
        let label = format!("{:.1}s", self.remaining.as_secs_f64());

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label_x = inner.x + (inner.width.saturating_sub(label.len() as u16)) / 2;
        buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
    }
}
