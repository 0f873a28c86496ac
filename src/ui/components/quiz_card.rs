use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use tabledrill::session::quiz::Feedback;

use crate::app::QuizView;
use crate::ui::theme::Theme;

pub struct QuizCard<'a> {
    pub view: &'a QuizView,
    pub score: usize,
    pub theme: &'a Theme,
}

impl Widget for QuizCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let view = self.view;

        let title = if view.bonus {
            format!(" Diamond Challenge  {}/{} ", view.index + 1, view.total)
        } else {
            format!(" Question {}/{} ", view.index + 1, view.total)
        };
        let block = Block::bordered()
            .title(title)
            .title_bottom(format!(" Score {} ", self.score))
            .border_style(Style::default().fg(if view.bonus {
                colors.warning()
            } else {
                colors.accent()
            }))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            &*view.prompt,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(rows[1], buf);

        let cursor = if view.input_enabled { "_" } else { "" };
        Paragraph::new(Line::from(vec![
            Span::styled("> ", Style::default().fg(colors.muted())),
            Span::styled(
                format!("{}{cursor}", view.input),
                Style::default().fg(colors.accent()),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(rows[2], buf);

        let feedback = match &view.feedback {
            None => Line::from(""),
            Some(Feedback::Correct) => Line::from(Span::styled(
                "Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )),
            Some(Feedback::Incorrect { expected }) => Line::from(vec![
                Span::styled("Not quite. ", Style::default().fg(colors.error())),
                Span::styled(
                    format!("Answer: {expected}"),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Some(Feedback::TimedOut { expected }) => Line::from(vec![
                Span::styled("Time's up. ", Style::default().fg(colors.warning())),
                Span::styled(
                    format!("Answer: {expected}"),
                    Style::default().fg(colors.fg()),
                ),
            ]),
        };
        Paragraph::new(feedback)
            .alignment(Alignment::Center)
            .render(rows[3], buf);
    }
}
