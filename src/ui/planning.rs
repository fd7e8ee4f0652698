//! Planning board rendering: five columns plus the add-task form overlay.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::board::ColumnId;
use crate::data::format::{format_date_safely, truncate};
use crate::pages::planning::{FormField, PlanningPage, TaskForm};
use crate::ui::{field_lines, panel};

pub fn render(frame: &mut Frame, app: &App, page: &PlanningPage, area: Rect) {
    let constraints = ColumnId::ALL.map(|_| Constraint::Ratio(1, ColumnId::ALL.len() as u32));
    let columns = Layout::horizontal(constraints).split(area);
    let (cursor_column, cursor_index) = page.cursor();

    for (slot, column) in ColumnId::ALL.iter().enumerate() {
        let tasks = &page.board().column(*column).tasks;
        let focused = *column == cursor_column;
        let width = columns[slot].width.saturating_sub(4) as usize;

        let items: Vec<ListItem> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let grabbed = page.grabbed() == Some((*column, i));
                let marker = if grabbed { "✋ " } else { "" };
                let title_style = if grabbed {
                    Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                ListItem::new(vec![
                    Line::from(Span::styled(
                        format!("{}{}", marker, truncate(&task.title, width)),
                        title_style,
                    )),
                    Line::from(vec![
                        Span::styled(task.priority.label(), app.theme.priority_style(task.priority)),
                        Span::raw(" · "),
                        Span::raw(task.category.label()),
                    ]),
                    Line::styled(
                        truncate(&format_date_safely(&task.created_at), width),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                ])
            })
            .collect();

        let title = format!(" {} ({}) ", column.title(), tasks.len());
        let list = List::new(items)
            .block(panel(app, title, focused))
            .highlight_style(app.theme.selected);

        let mut state = ListState::default();
        if focused && !tasks.is_empty() {
            state.select(Some(cursor_index));
        }
        frame.render_stateful_widget(list, columns[slot], &mut state);
    }

    if let Some(form) = page.form() {
        render_form(frame, app, form, area);
    }
}

fn render_form(frame: &mut Frame, app: &App, form: &TaskForm, area: Rect) {
    let width = 56u16.min(area.width.saturating_sub(4));
    let height = 12u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let form_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, form_area);
    let block = panel(app, format!(" New task in {} ", form.column.title()), true);
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let rows = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(2),
        Constraint::Length(1),
    ])
    .split(inner);

    let label = |text: &'static str, active: bool| {
        if active {
            Span::styled(text, app.theme.header)
        } else {
            Span::raw(text)
        }
    };

    let title_focused = form.focus == FormField::Title;
    let mut title_line = vec![label("Title: ", title_focused)];
    title_line.extend(
        field_lines(&form.title, title_focused, app)
            .into_iter()
            .flat_map(|l| l.spans),
    );
    frame.render_widget(Paragraph::new(Line::from(title_line)), rows[0]);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw("Priority: "),
            Span::styled(
                form.draft.priority.label(),
                app.theme.priority_style(form.draft.priority),
            ),
            Span::raw("   Type: "),
            Span::raw(form.draft.category.label()),
        ])),
        rows[1],
    );

    let desc_focused = form.focus == FormField::Description;
    frame.render_widget(
        Paragraph::new(Line::from(label("Description:", desc_focused))),
        rows[2],
    );
    frame.render_widget(
        Paragraph::new(field_lines(&form.description, desc_focused, app)),
        rows[3],
    );
    frame.render_widget(
        Paragraph::new("Enter/^S add  Tab field  ^P priority  ^T type  Esc cancel")
            .style(Style::default().add_modifier(Modifier::DIM)),
        rows[4],
    );
}
