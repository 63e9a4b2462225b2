use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::ui::styles;
use crate::utils::truncate_string;

/// Render the roster screen - section metadata above the student list.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(area);

    render_section_block(frame, app, chunks[0]);
    render_student_list(frame, app, chunks[1]);
}

/// The metadata block stays empty until its fetch arrives; the student
/// list below renders regardless.
fn render_section_block(frame: &mut Frame, app: &App, area: Rect) {
    let lines = match &app.section {
        Some(section) => vec![
            Line::from(vec![
                Span::styled("Course: ", styles::muted_style()),
                Span::styled(section.mentor.course.name.clone(), styles::title_style()),
                Span::styled(format!(" (section {})", app.section_id), styles::muted_style()),
            ]),
            Line::from(vec![
                Span::styled("Mentor: ", styles::muted_style()),
                Span::raw(truncate_string(
                    &section.mentor.user.full_name(),
                    area.width.saturating_sub(10) as usize,
                )),
            ]),
        ],
        None => vec![],
    };

    let block = Block::default()
        .title(" Section ")
        .title_style(styles::muted_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_student_list(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .students
        .iter()
        .map(|student| {
            ListItem::new(Line::from(vec![
                Span::styled(student.user.display_name(), styles::list_item_style()),
                Span::styled(format!(" (id: {})", student.id), styles::muted_style()),
            ]))
        })
        .collect();

    let title = format!(
        " Students ({}) - [Enter] details  [d]rop ",
        app.students.len()
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
    if !app.students.is_empty() {
        state.select(Some(app.roster_selection));
    }

    frame.render_stateful_widget(list, area, &mut state);
}
