use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use tabledrill::session::question::ExerciseType;

use crate::ui::theme::Theme;

fn description(mode: ExerciseType) -> &'static str {
    match mode {
        ExerciseType::Multiplication => "Times tables, 1 to 10 of each",
        ExerciseType::Addition => "Add 1 to 10 to each table",
        ExerciseType::Subtraction => "Differences, never below zero",
        ExerciseType::Factorization => "Name a factor pair of the product",
        ExerciseType::Megamix => "Everything, every table, 100 cards",
    }
}

/// Exercise mode list on the setup screen.
pub struct ModeMenu<'a> {
    pub selected: usize,
    pub focused: bool,
    pub theme: &'a Theme,
}

impl<'a> ModeMenu<'a> {
    pub fn new(selected: usize, focused: bool, theme: &'a Theme) -> Self {
        Self {
            selected,
            focused,
            theme,
        }
    }
}

impl Widget for ModeMenu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Mode ")
            .border_style(Style::default().fg(if self.focused {
                colors.border_focused()
            } else {
                colors.border()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                ExerciseType::ALL
                    .iter()
                    .map(|_| Constraint::Length(2))
                    .collect::<Vec<_>>(),
            )
            .split(inner);

        for (i, mode) in ExerciseType::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", i + 1, mode.label()),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("       {}", description(*mode)),
                    Style::default().fg(colors.muted()),
                )),
            ];
            if let Some(row) = rows.get(i) {
                Paragraph::new(lines).render(*row, buf);
            }
        }
    }
}
