use crate::state::{AppState, Phase, ServiceStatus};
use crate::types::{Classification, LabelPrediction};
use crate::verdict::{verdict_for, Verdict};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Row, Table, Wrap},
    Frame,
};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the whole screen: hero copy on the left, the classifier panel
/// on the right, and a one-line status bar at the bottom.
pub fn render(f: &mut Frame, app: &AppState) {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(f.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(outer[0]);

    render_hero(f, columns[0]);
    render_classifier(f, columns[1], app);
    render_status_bar(f, outer[1], app);
}

fn render_hero(f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let brand = Paragraph::new(Line::from(Span::styled(
        "Gavel",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    )));
    f.render_widget(brand, chunks[0]);

    let headline = Paragraph::new(vec![
        Line::from(Span::styled(
            "Intelligent",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Comment",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Classification",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ]);
    f.render_widget(headline, chunks[1]);

    let tagline = Paragraph::new(
        "Harness the power of machine learning to automatically categorize \
         and analyze comments with precision and speed.",
    )
    .style(Style::default().fg(Color::DarkGray))
    .wrap(Wrap { trim: true });
    f.render_widget(tagline, chunks[2]);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(chunks[3]);
    render_feature_card(
        f,
        cards[0],
        Color::Magenta,
        "Accurate Classification",
        "AI-powered analysis with high precision rates",
    );
    render_feature_card(
        f,
        cards[1],
        Color::LightMagenta,
        "Real-time Processing",
        "Instant results with lightning-fast analysis",
    );
    render_feature_card(
        f,
        cards[2],
        Color::Blue,
        "Continuous Learning",
        "Improving accuracy through feedback",
    );

    let cta = Paragraph::new(Line::from(Span::styled(
        "View Feedback (coming soon)",
        Style::default().fg(Color::DarkGray),
    )));
    f.render_widget(cta, chunks[4]);
}

fn render_feature_card(f: &mut Frame, area: Rect, color: Color, title: &str, description: &str) {
    let text = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            description,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let card = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(card, area);
}

fn render_classifier(f: &mut Frame, area: Rect, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(5),
        ])
        .split(area);

    render_input(f, chunks[0], app);
    render_hint(f, chunks[1], app);
    render_outcome(f, chunks[2], app);
    render_session_stats(f, chunks[3]);
}

fn render_input(f: &mut Frame, area: Rect, app: &AppState) {
    let width = area.width.saturating_sub(2) as usize;
    let (visible, col) = input_window(&app.comment, app.cursor, width);
    let border = if app.phase.is_pending() {
        Color::Yellow
    } else {
        Color::Magenta
    };
    let input = Paragraph::new(visible).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Enter your comment")
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(input, area);
    if !app.phase.is_pending() {
        f.set_cursor_position((area.x + 1 + col as u16, area.y + 1));
    }
}

fn render_hint(f: &mut Frame, area: Rect, app: &AppState) {
    let hint = match &app.phase {
        Phase::Pending => Line::from(vec![
            Span::styled(
                SPINNER[(app.ticks as usize) % SPINNER.len()],
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(" Classifying...", Style::default().fg(Color::Yellow)),
        ]),
        Phase::Idle if app.comment.is_empty() => Line::from(Span::styled(
            "Type a comment to get started",
            Style::default().fg(Color::DarkGray),
        )),
        Phase::Idle => Line::from(Span::styled(
            "Press Enter to classify",
            Style::default().fg(Color::DarkGray),
        )),
        _ => Line::from(Span::styled(
            "Edit the comment to start over",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(hint), area);
}

fn render_outcome(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.phase {
        Phase::Idle | Phase::Pending => {}
        Phase::Failed(message) => render_error(f, area, message),
        Phase::Success(classification) => match verdict_for(classification) {
            Verdict::Benign => render_benign_banner(f, area),
            Verdict::Flagged => render_result_card(f, area, classification),
        },
    }
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(Color::Red)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_benign_banner(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "This comment is non toxic 😊",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let banner = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(banner, area);
}

fn render_result_card(f: &mut Frame, area: Rect, classification: &Classification) {
    let ranked = classification.ranked_predictions();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(if ranked.is_empty() {
            [Constraint::Length(4), Constraint::Min(0)]
        } else {
            [Constraint::Length(4), Constraint::Min(4)]
        })
        .split(area);

    let card = Block::default()
        .borders(Borders::ALL)
        .title("Classification Result")
        .border_style(Style::default().fg(Color::Green));
    let inner = card.inner(chunks[0]);
    f.render_widget(card, chunks[0]);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let headline = Line::from(vec![
        Span::styled(
            capitalize(&classification.category),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{:.1}% confidence", classification.confidence),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    f.render_widget(Paragraph::new(headline), rows[0]);

    let gauge = Gauge::default()
        .ratio(confidence_ratio(classification.confidence))
        .label(format!("{:.1}%", classification.confidence))
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray));
    f.render_widget(gauge, rows[1]);

    if !ranked.is_empty() {
        render_predictions(f, chunks[1], &ranked);
    }
}

fn render_predictions(f: &mut Frame, area: Rect, ranked: &[(&str, &LabelPrediction)]) {
    let rows: Vec<Row> = ranked
        .iter()
        .map(|(label, prediction)| {
            let flagged = if prediction.predicted == 1 { "yes" } else { "-" };
            let style = if prediction.predicted == 1 {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                label.to_string(),
                flagged.to_string(),
                format!("{:.2}%", prediction.confidence),
            ])
            .style(style)
        })
        .collect();

    let header = Row::new(vec!["Label", "Flagged", "Confidence"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows,
        [
            Constraint::Min(12),
            Constraint::Length(9),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("All predictions")
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(table, area);
}

// Showcase numbers from the landing copy, not live metrics.
fn render_session_stats(f: &mut Frame, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);
    render_stat_card(f, cards[0], "1,247", "Comments Processed");
    render_stat_card(f, cards[1], "96.8%", "Accuracy Rate");
}

fn render_stat_card(f: &mut Frame, area: Rect, value: &str, label: &str) {
    let text = vec![
        Line::from(Span::styled(
            value,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
    ];
    let card = Paragraph::new(text)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(card, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = Vec::new();
    match &app.service {
        ServiceStatus::Unknown => spans.push(Span::styled(
            " UNCHECKED ",
            Style::default().fg(Color::DarkGray),
        )),
        ServiceStatus::Checking => spans.push(Span::styled(
            " CHECKING ",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        )),
        ServiceStatus::Reachable { report, at } => {
            spans.push(Span::styled(
                format!(" {} ", report.status.to_uppercase()),
                Style::default().bg(Color::Green).fg(Color::Black),
            ));
            if let Some(labels) = &report.available_labels {
                spans.push(Span::raw(format!(" {} labels", labels.len())));
            }
            spans.push(Span::raw(format!(" checked {}", at.format("%H:%M:%S"))));
        }
        ServiceStatus::Unreachable { at, .. } => {
            spans.push(Span::styled(
                " UNREACHABLE ",
                Style::default().bg(Color::Red).fg(Color::White),
            ));
            spans.push(Span::raw(format!(" checked {}", at.format("%H:%M:%S"))));
        }
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(
        app.base_url.as_str(),
        Style::default().fg(Color::Cyan),
    ));
    spans.push(Span::raw(" | "));
    spans.push(Span::raw(format!("session: {} classified", app.classified)));
    spans.push(Span::styled(
        "  Enter:Classify  ^T:Check  ^U:Clear  Esc:Quit",
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Horizontal window over the input so the cursor stays visible in a
/// single-line field. Returns the visible slice and the cursor column
/// within it. Positions are in characters.
fn input_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<char> = text.chars().collect();
    let start = if cursor < width { 0 } else { cursor + 1 - width };
    let end = (start + width).min(chars.len());
    let visible: String = chars[start..end].iter().collect();
    (visible, cursor - start)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Gauge fill for a confidence percentage. Very small values keep a 5%
/// floor so the bar never vanishes, and out-of-range values are clamped.
fn confidence_ratio(confidence: f64) -> f64 {
    (confidence.max(5.0) / 100.0).min(1.0)
}
