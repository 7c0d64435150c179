use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{app::App, corpus::Difficulty, evaluator::Track, session::SessionStatus};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const INPUT_LINES: u16 = 6;

/// Rows needed to show `text` wrapped at `width` columns
fn occupied_lines(text: &str, width: u16) -> u16 {
    let width = width.max(1) as usize;
    text.split('\n')
        .map(|line| line.width().div_ceil(width).max(1))
        .sum::<usize>()
        .min(u16::MAX as usize) as u16
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let selected_style = Style::default()
            .patch(bold_style)
            .fg(Color::Cyan)
            .add_modifier(Modifier::REVERSED);

        // borders eat one column on each side
        let inner_width = area
            .width
            .saturating_sub(HORIZONTAL_MARGIN * 2)
            .saturating_sub(2);
        let paragraph_lines = occupied_lines(self.paragraph(), inner_width);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),                   // title
                Constraint::Length(1),                   // difficulty selector
                Constraint::Length(1),                   // time
                Constraint::Length(paragraph_lines + 2), // paragraph
                Constraint::Length(INPUT_LINES + 2),     // input box
                Constraint::Length(1),                   // controls
                Constraint::Length(3),                   // results
                Constraint::Min(0),
            ])
            .split(area);

        Paragraph::new(Span::styled("Typing Speed Test", bold_style.fg(Color::Blue)))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let mut selector = vec![Span::raw("Difficulty: ")];
        for d in Difficulty::ALL {
            let label = format!(" {d} ");
            selector.push(if d == self.difficulty {
                Span::styled(label, selected_style)
            } else {
                Span::styled(label, dim_style)
            });
            selector.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(selector))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);

        Paragraph::new(Span::styled(self.time_label(), dim_style.fg(Color::Gray)))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let paragraph_style = match self.paragraph_track() {
            Some(Track::OnTrack) => bold_style.fg(Color::Green),
            Some(Track::OffTrack) => bold_style.fg(Color::Red),
            None => bold_style,
        };
        Paragraph::new(Span::styled(self.paragraph(), paragraph_style))
            .block(Block::default().borders(Borders::ALL))
            .alignment(if paragraph_lines == 1 {
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true })
            .render(chunks[3], buf);

        let mut input_lines: Vec<Line> = self.typed().split('\n').map(Line::raw).collect();
        if self.input_enabled() {
            let cursor = Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED));
            if let Some(last) = input_lines.last_mut() {
                last.push_span(cursor);
            }
        }
        let (input_title, input_style) = match self.status() {
            SessionStatus::Running => ("Type here", Style::default()),
            SessionStatus::Completed => ("Done", dim_style),
            SessionStatus::Idle => ("Start a test to type", dim_style),
        };
        // wrapped rows, counting the cursor cell, so the box follows the cursor
        let cursor_pad = if self.input_enabled() { " " } else { "" };
        let typed_rows = occupied_lines(&format!("{}{cursor_pad}", self.typed()), inner_width);
        Paragraph::new(Text::from(input_lines))
            .style(input_style)
            .block(Block::default().borders(Borders::ALL).title(input_title))
            .wrap(Wrap { trim: false })
            .scroll((typed_rows.saturating_sub(INPUT_LINES), 0))
            .render(chunks[4], buf);

        let controls = if self.input_enabled() {
            "(ctrl+s) start / (ctrl+r) reset / (tab) difficulty / (esc) quit"
        } else {
            "(enter) start / (r)eset / (←/→) difficulty / (esc) quit"
        };
        Paragraph::new(Span::styled(controls, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);

        let results = Block::default()
            .borders(Borders::ALL)
            .title("Results")
            .title_alignment(Alignment::Center);
        let results_area = results.inner(chunks[6]);
        results.render(chunks[6], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(results_area);
        Paragraph::new(Span::styled(self.wpm_label(), bold_style))
            .alignment(Alignment::Center)
            .render(columns[0], buf);
        Paragraph::new(Span::styled(self.accuracy_label(), bold_style))
            .alignment(Alignment::Center)
            .render(columns[1], buf);
    }
}
