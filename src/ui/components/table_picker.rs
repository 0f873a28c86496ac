use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

const COLUMNS: usize = 4;

/// 3x4 grid of table toggles.
pub struct TablePicker<'a> {
    pub tables: &'a [bool; 12],
    pub cursor: usize,
    pub focused: bool,
    pub disabled: bool,
    pub theme: &'a Theme,
}

impl Widget for TablePicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let title = if self.disabled {
            " Tables (all) "
        } else {
            " Tables "
        };
        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(if self.focused {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from("")];
        for (r, cells) in self.tables.chunks(COLUMNS).enumerate() {
            let mut spans = vec![Span::raw("  ")];
            for (c, &on) in cells.iter().enumerate() {
                let idx = r * COLUMNS + c;
                let mark = if on || self.disabled { "x" } else { " " };
                let mut style = Style::default().fg(if on || self.disabled {
                    colors.success()
                } else {
                    colors.fg()
                });
                if self.focused && idx == self.cursor {
                    style = style.fg(colors.accent()).add_modifier(Modifier::REVERSED);
                }
                spans.push(Span::styled(format!("[{mark}] {:>2}", idx + 1), style));
                spans.push(Span::raw("   "));
            }
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines).render(inner, buf);
    }
}
