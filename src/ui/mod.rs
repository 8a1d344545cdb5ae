use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::app::{App, Background, BACKGROUND};

fn frame_block() -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Rgb(60, 70, 140)))
        .title(" ◬ Delta ")
        .title_style(
            Style::default()
                .fg(Color::Rgb(138, 148, 255))
                .add_modifier(Modifier::BOLD),
        )
        .style(Style::default().bg(Color::from(BACKGROUND)))
}

fn split(area: Rect) -> (Rect, Rect) {
    let inner = frame_block().inner(area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Animation field
            Constraint::Length(1), // Status bar
        ])
        .split(inner);
    (chunks[0], chunks[1])
}

/// Rect the animation surface covers inside a terminal of size `area`.
pub fn field_area(area: Rect) -> Rect {
    split(area).0
}

pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let Background::Animating { animator, .. } = &mut app.background else {
        frame.render_widget(Clear, area);
        return;
    };

    frame.render_widget(frame_block(), area);
    let (field, status_area) = split(area);

    // Normally a no-op: `App::on_resize` already matched the surface to the field.
    animator
        .surface_mut()
        .resize(field.width as usize, field.height as usize);
    frame.render_widget(Paragraph::new(animator.surface().to_lines()), field);

    let dim = Style::default().fg(Color::Rgb(90, 96, 130));
    let sep = Style::default().fg(Color::Rgb(50, 54, 80));
    let clock = animator.last_frame().map_or(0.0, |snap| snap.clock);
    let mut spans = vec![Span::styled(
        format!(" t {:>7.2} ", clock),
        Style::default()
            .fg(Color::Rgb(122, 92, 255))
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(snap) = animator.last_frame() {
        let (ee, at) = (snap.end_effector, snap.end_effector_screen);
        spans.push(Span::styled("| ", sep));
        spans.push(Span::styled(
            format!("EE {:>6.1} {:>6.1} {:>6.1} ", ee.x, ee.y, ee.z),
            Style::default().fg(Color::Rgb(138, 148, 255)),
        ));
        spans.push(Span::styled(format!("@ {:.0},{:.0} ", at.x, at.y), dim));
    }
    spans.push(Span::styled("| ", sep));
    spans.push(Span::styled("q Quit", dim));
    frame.render_widget(Paragraph::new(Line::from(spans)), status_area);
}
