use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{App, Screen, GRID_COLUMNS};
use mathima::matching::GameStatus;
use mathima::stats::GameKind;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const PARTICLE_COLORS: [Color; 5] = [
    Color::Yellow,
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::LightBlue,
];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Menu => render_menu(self, area, buf),
            Screen::Match => render_match(self, area, buf),
            Screen::Quiz => render_quiz(self, area, buf),
            Screen::Writing => render_writing(self, area, buf),
            Screen::Results => render_results(self, area, buf),
            Screen::ItemStats => render_item_stats(self, area, buf),
        }
        render_celebration(self, area, buf);
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn centered_paragraph(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(height) / 2),
            Constraint::Min(height),
        ])
        .split(area);

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
}

/// Rough "x ago" phrasing for the stats screen.
fn humanize_ago(secs: i64) -> String {
    match secs {
        s if s < 60 => "λίγο".to_string(),
        s if s < 3600 => format!("{} λεπτά", s / 60),
        s if s < 86_400 => format!("{} ώρες", s / 3600),
        s => format!("{} μέρες", s / 86_400),
    }
}

/// Pad a (possibly Greek) string to a fixed display width.
pub fn pad_center(s: &str, width: usize) -> String {
    let w = s.width();
    if w >= width {
        return s.to_string();
    }
    let left = (width - w) / 2;
    let right = width - w - left;
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}

fn render_menu(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![
        Line::from(Span::styled("μ ά θ η μ α", bold().fg(Color::Cyan))),
        Line::from(Span::styled("παιχνίδια για να μάθεις ελληνικά", dim())),
        Line::from(""),
    ];

    for (idx, kind) in GameKind::ALL.iter().enumerate() {
        let style = if idx == app.menu_index {
            bold().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let marker = if idx == app.menu_index { "▸ " } else { "  " };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}", kind.title()),
            style,
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "↑/↓ επιλογή   enter έναρξη   s στατιστικά   esc έξοδος",
        dim(),
    )));

    centered_paragraph(lines, area, buf);
}

fn render_match(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.match_session;

    let status_note = match session.status {
        GameStatus::Paused => "  ΠΑΥΣΗ",
        _ => "",
    };
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "κινήσεις {}   ζευγάρια {}/{}   σκορ {}{}",
                session.stats.moves,
                session.stats.matches,
                session.total_pairs(),
                session.stats.score,
                status_note,
            ),
            bold(),
        )),
        Line::from(""),
    ];

    // Cards are kept in position order, so chunk them straight into rows
    let cell_width = session
        .cards
        .iter()
        .map(|c| c.face.width())
        .max()
        .unwrap_or(2)
        + 4;

    for row in session.cards.chunks(GRID_COLUMNS) {
        let mut spans: Vec<Span> = Vec::new();
        for card in row {
            let face = if card.is_matched || card.is_flipped {
                pad_center(&card.face, cell_width)
            } else {
                pad_center(&"▒".repeat(2), cell_width)
            };

            let mut style = if card.is_matched {
                dim().fg(Color::Green)
            } else if card.is_flipped {
                bold().fg(Color::Yellow)
            } else {
                Style::default()
            };
            if card.position == app.match_cursor && session.status == GameStatus::Playing {
                style = style.add_modifier(Modifier::REVERSED);
            }

            spans.push(Span::styled(face, style));
            spans.push(Span::raw("  "));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "βέλη μετακίνηση   enter γύρισμα   p παύση   r νέο παιχνίδι   esc μενού",
        dim(),
    )));

    centered_paragraph(lines, area, buf);
}

fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let quiz = match &app.quiz {
        Some(quiz) => quiz,
        None => return,
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "ερώτηση {}/{}   σωστά {}   λάθη {}",
            (quiz.index + 1).min(quiz.total()),
            quiz.total(),
            quiz.correct,
            quiz.wrong
        ),
        dim(),
    ))];
    lines.push(Line::from(""));

    if let Some(question) = quiz.current() {
        lines.push(Line::from(Span::styled(question.prompt.clone(), bold())));
        lines.push(Line::from(""));
        for (idx, option) in question.options.iter().enumerate() {
            lines.push(Line::from(Span::raw(format!("{}) {}", idx + 1, option))));
        }
    }

    lines.push(Line::from(""));
    if let Some(feedback) = &app.feedback {
        let color = if feedback.was_correct {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(Span::styled(
            feedback.headline.clone(),
            bold().fg(color),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("1-4 απάντηση   esc μενού", dim())));

    centered_paragraph(lines, area, buf);
}

fn render_writing(app: &App, area: Rect, buf: &mut Buffer) {
    let writing = match &app.writing {
        Some(writing) => writing,
        None => return,
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "λέξη {}/{}   σωστά {}   λάθη {}",
            (writing.index + 1).min(writing.total()),
            writing.total(),
            writing.correct(),
            writing.wrong
        ),
        dim(),
    ))];
    lines.push(Line::from(""));

    if let Some(word) = writing.current() {
        lines.push(Line::from(Span::styled(
            format!("Πώς λέγεται στα ελληνικά «{}»;", word.english),
            bold(),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("> ", dim()),
            Span::styled(app.input.clone(), bold().fg(Color::Yellow)),
            Span::styled("█", dim()),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(feedback) = &app.feedback {
        let color = if feedback.was_correct {
            Color::Green
        } else {
            Color::Red
        };
        lines.push(Line::from(Span::styled(
            feedback.headline.clone(),
            bold().fg(color),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "πληκτρολόγησε και enter   esc μενού",
        dim(),
    )));

    centered_paragraph(lines, area, buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let summary = match &app.summary {
        Some(summary) => summary,
        None => return,
    };

    let mut lines = vec![
        Line::from(Span::styled("τέλος!", bold().fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(summary.game.title(), bold())),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{}/{} σωστά   {}% ακρίβεια",
                summary.correct, summary.total, summary.accuracy
            ),
            bold(),
        )),
    ];

    if let (Some(score), Some(moves)) = (summary.score, summary.moves) {
        lines.push(Line::from(Span::styled(
            format!("σκορ {score}   κινήσεις {moves}"),
            Style::default(),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("χρόνος {:.0}s", summary.elapsed_secs),
        dim(),
    )));

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "r ξανά   m μενού   s στατιστικά   t κοινοποίηση   esc έξοδος",
        dim(),
    )));

    centered_paragraph(lines, area, buf);
}

fn render_item_stats(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = vec![Line::from(Span::styled(
        "δύσκολες λέξεις",
        bold().fg(Color::Cyan),
    ))];

    if let Some(secs) = app.last_practiced_secs {
        lines.push(Line::from(Span::styled(
            format!("τελευταία εξάσκηση πριν από {}", humanize_ago(secs)),
            dim(),
        )));
    }
    lines.push(Line::from(""));

    if app.stats_rows.is_empty() {
        lines.push(Line::from(Span::styled(
            "δεν υπάρχουν ακόμα καταγεγραμμένες απαντήσεις",
            dim(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!(
                "{:<18} {:>7} {:>9} {:>7}",
                "λέξη", "λάθη", "χρόνος", "φορές"
            ),
            dim(),
        )));
        for row in &app.stats_rows {
            let style = if row.miss_rate >= 50.0 {
                Style::default().fg(Color::Red)
            } else if row.miss_rate >= 20.0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Green)
            };
            lines.push(Line::from(Span::styled(
                format!(
                    "{:<18} {:>6.1}% {:>7.0}ms {:>7}",
                    row.item_id, row.miss_rate, row.avg_answer_ms, row.attempts
                ),
                style,
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "e εξαγωγή csv   esc πίσω",
        dim(),
    )));

    centered_paragraph(lines, area, buf);
}

fn render_celebration(app: &App, area: Rect, buf: &mut Buffer) {
    if !app.celebration.is_active {
        return;
    }
    for particle in &app.celebration.particles {
        let x = particle.x.round();
        let y = particle.y.round();
        if x < 0.0 || y < 0.0 {
            continue;
        }
        let (x, y) = (x as u16, y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(particle.symbol);
            cell.set_fg(PARTICLE_COLORS[particle.color_index % PARTICLE_COLORS.len()]);
        }
    }
}
