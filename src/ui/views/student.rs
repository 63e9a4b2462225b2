use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::format_date;

/// Render the student detail screen - metadata above the attendance list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(3)])
        .split(area);

    render_student_block(frame, app, chunks[0]);
    render_attendance_list(frame, app, chunks[1]);
}

fn render_student_block(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match &app.student {
        Some(student) => {
            let id = app.student_id.map(|id| id.to_string()).unwrap_or_default();
            vec![
                Line::from(vec![
                    Span::styled(student.user.full_name(), styles::title_style()),
                    Span::styled(format!(" (id: {})", id), styles::muted_style()),
                ]),
                Line::from(vec![
                    Span::styled("Course: ", styles::muted_style()),
                    Span::raw(format!(
                        "{} (id: {})",
                        student.course.name, student.course.id
                    )),
                ]),
                Line::from(vec![
                    Span::styled("Mentor: ", styles::muted_style()),
                    Span::raw(student.mentor_name()),
                ]),
            ]
        }
        None => vec![],
    };

    let block = Block::default()
        .title(" Student ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_attendance_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .attendances
        .iter()
        .map(|attendance| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<14}", format_date(&attendance.date)),
                    styles::list_item_style(),
                ),
                Span::styled(
                    attendance.status_label(),
                    styles::presence_style(attendance.status()),
                ),
            ]))
        })
        .collect();

    let title = format!(
        " Attendances ({}) - [p]resent [e]xcused [u]nexcused ",
        app.attendances.len()
    );

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .title_style(styles::muted_style())
                .borders(Borders::ALL)
                .border_style(styles::border_style(true)),
        )
        .highlight_style(styles::selected_style());

    let mut state = ListState::default();
    if !app.attendances.is_empty() {
        state.select(Some(app.attendance_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
