use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use tabledrill::engine::scoring::{self, Celebration};
use tabledrill::session::result::{BonusStatus, SessionOutcome, SessionSummary};

use crate::ui::theme::Theme;

pub struct Results<'a> {
    pub summary: &'a SessionSummary,
    pub outcome: &'a SessionOutcome,
    pub theme: &'a Theme,
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let summary = self.summary;
        let outcome = self.outcome;

        let block = Block::bordered()
            .title(" Session Complete ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        let banner = match outcome.celebration {
            Some(Celebration::Ultimate) => Span::styled(
                "DIAMOND CHALLENGE CONQUERED! 200 out of 200!",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            ),
            Some(Celebration::Standard) if outcome.perfect => Span::styled(
                "Perfect score!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
            Some(Celebration::Standard) => Span::styled(
                "New personal best!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(
                format!("{} results", summary.mode.label()),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        };
        Paragraph::new(Line::from(banner))
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let pct = scoring::ratio(summary.score, summary.total) * 100.0;
        let score_color = if pct >= 90.0 {
            colors.success()
        } else if pct >= 70.0 {
            colors.warning()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled("  Score:      ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{}/{}", summary.score, summary.total),
                Style::default()
                    .fg(score_color)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  ({pct:.0}%)"), Style::default().fg(colors.muted())),
        ]))
        .render(layout[1], buf);

        Paragraph::new(Line::from(vec![
            Span::styled("  Avg. time:  ", Style::default().fg(colors.fg())),
            Span::styled(
                format!("{:.1}s per question", summary.mean_time_seconds),
                Style::default().fg(colors.fg()),
            ),
        ]))
        .render(layout[2], buf);

        let tables = summary
            .tables
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Paragraph::new(Line::from(vec![
            Span::styled("  Tables:     ", Style::default().fg(colors.fg())),
            Span::styled(tables, Style::default().fg(colors.muted())),
        ]))
        .render(layout[3], buf);

        let note = match summary.bonus {
            BonusStatus::Declined => "  Bonus round declined",
            BonusStatus::Played => "  Includes the Diamond Challenge",
            BonusStatus::NotPlayed if !summary.is_full_length() => "  Ended early",
            BonusStatus::NotPlayed => "",
        };
        Paragraph::new(Line::from(Span::styled(
            note,
            Style::default().fg(colors.muted()),
        )))
        .render(layout[4], buf);

        if !outcome.badges.is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                "  Badges earned:",
                Style::default().fg(colors.fg()),
            ))];
            for badge in &outcome.badges {
                lines.push(Line::from(Span::styled(
                    format!("    * {}", badge.label()),
                    Style::default().fg(colors.warning()),
                )));
            }
            Paragraph::new(lines).render(layout[5], buf);
        }
    }
}
