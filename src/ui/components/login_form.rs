use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::LoginField;
use crate::ui::theme::Theme;

pub struct LoginForm<'a> {
    pub name: &'a str,
    pub group_key: &'a str,
    pub field: LoginField,
    pub theme: &'a Theme,
}

impl Widget for LoginForm<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Who's practising? ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let field_line = |label: &str, value: &str, active: bool| {
            let cursor = if active { "_" } else { "" };
            Line::from(vec![
                Span::styled(
                    format!("  {label:<11}"),
                    Style::default().fg(if active { colors.accent() } else { colors.fg() }),
                ),
                Span::styled(
                    format!("{value}{cursor}"),
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(if active { Modifier::BOLD } else { Modifier::empty() }),
                ),
            ])
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "tabledrill",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            Line::from(""),
            field_line("Name:", self.name, self.field == LoginField::Name),
            Line::from(""),
            field_line("Group key:", self.group_key, self.field == LoginField::GroupKey),
            Line::from(Span::styled(
                "  (optional, shared by your class)",
                Style::default().fg(colors.muted()),
            )),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}
