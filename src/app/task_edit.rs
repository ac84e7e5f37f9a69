use chrono::{DateTime, NaiveDate, Utc};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use tracing::debug;

use crate::app::message::Confirmation;
use crate::app::models::{Task, TaskId};
use crate::app::store::StoreError;
use crate::app::task_list::TaskList;
use derivative::Derivative;

use super::ui::App;

const DATE_FORMAT: &str = "%d.%m.%Y";

const DESCRIPTION_LINE: usize = 0;
const DUE_DATE_LINE: usize = 1;

// State object for the task edit dialog
// Keeps track of the state of the dialog and the content of the task being edited
#[derive(Derivative)]
#[derivative(Default)]
pub struct TaskEditDialogState {
    pub dialog_active: bool,
    task_id: Option<TaskId>,
    content: TaskEditDialogContent,
    error_message: Option<String>,
    // (char index, line index)
    cursor_position: (usize, usize),
}

// Current content of the task being edited/created
#[derive(Derivative)]
#[derivative(Default)]
struct TaskEditDialogContent {
    description: String,
    #[derivative(Default(value = "Utc::now().format(DATE_FORMAT).to_string()"))]
    due_date: String,
}

impl TaskEditDialogState {
    // Opens the dialog and prepares to accept an input for the new task
    pub fn create_a_new_task(&mut self) {
        self.dialog_active = true;
        self.task_id = None;
        self.error_message = None;
        self.content = TaskEditDialogContent::default();
        self.cursor_position = (0, DESCRIPTION_LINE);
    }

    // Opens the dialog for an existing task. Only the description can change.
    pub fn edit_task(&mut self, task: &Task) {
        self.dialog_active = true;
        self.task_id = Some(task.id);
        self.error_message = None;
        self.content = TaskEditDialogContent {
            description: task.description.clone(),
            due_date: task.due_date.format(DATE_FORMAT).to_string(),
        };
        self.cursor_position = (task.description.chars().count(), DESCRIPTION_LINE);
    }

    pub fn cancel(&mut self) {
        self.dialog_active = false;
        self.error_message = None;
    }

    pub fn is_editing_existing(&self) -> bool {
        self.task_id.is_some()
    }

    // Last line the cursor may reach; the due date is fixed once a task exists
    fn last_editable_line(&self) -> usize {
        if self.is_editing_existing() {
            DESCRIPTION_LINE
        } else {
            DUE_DATE_LINE
        }
    }

    // Move the cursor one line BELOW the current one, keeping the column if possible
    pub fn move_cursor_down(&mut self) {
        let (x, y) = self.cursor_position;
        let future_y = (y + 1).min(self.last_editable_line());
        self.cursor_position = (x.min(self.line_length(future_y)), future_y);
    }

    // Move the cursor one line ABOVE the current one, keeping the column if possible
    pub fn move_cursor_up(&mut self) {
        let (x, y) = self.cursor_position;
        let future_y = y.saturating_sub(1);
        self.cursor_position = (x.min(self.line_length(future_y)), future_y);
    }

    pub fn move_cursor_left(&mut self) {
        let (x, y) = self.cursor_position;
        self.cursor_position = (x.saturating_sub(1), y);
    }

    pub fn move_cursor_right(&mut self) {
        let (x, y) = self.cursor_position;
        self.cursor_position = ((x + 1).min(self.line_length(y)), y);
    }

    // Delete the char before the cursor
    pub fn delete_char(&mut self) {
        let (x, y) = self.cursor_position;
        if x == 0 {
            return;
        }

        if let Some(line) = self.line_mut(y) {
            let at = byte_offset(line, x - 1);
            line.remove(at);
        }
        self.move_cursor_left();
    }

    // Insert a char at the cursor of the active line
    pub fn input(&mut self, to_insert: char) {
        let (x, y) = self.cursor_position;
        if let Some(line) = self.line_mut(y) {
            let at = byte_offset(line, x);
            line.insert(at, to_insert);
        }
        self.move_cursor_right();
    }

    fn line(&self, y: usize) -> &str {
        match y {
            DESCRIPTION_LINE => &self.content.description,
            DUE_DATE_LINE => &self.content.due_date,
            _ => "",
        }
    }

    fn line_mut(&mut self, y: usize) -> Option<&mut String> {
        match y {
            DESCRIPTION_LINE => Some(&mut self.content.description),
            DUE_DATE_LINE if !self.is_editing_existing() => Some(&mut self.content.due_date),
            _ => None,
        }
    }

    fn line_length(&self, y: usize) -> usize {
        self.line(y).chars().count()
    }

    // Saves the dialog content into the task list.
    // Returns None (and keeps the dialog open) when the input was rejected.
    pub fn save_task(&mut self, tasks: &mut TaskList) -> Option<Result<Confirmation, StoreError>> {
        let description = self.content.description.clone();

        let outcome = match self.task_id {
            Some(id) => tasks.update_description(id, description),
            None => {
                let due_date = match parse_due_date(&self.content.due_date) {
                    Some(date) => date,
                    None => {
                        debug!(input = %self.content.due_date, "rejected due date");
                        self.error_message = Some("Date should be in format dd.mm.yyyy".to_string());
                        return None;
                    }
                };
                tasks.add(description, due_date)
            }
        };

        self.error_message = None;
        self.dialog_active = false;
        Some(outcome)
    }
}

// Parse a dd.mm.yyyy date as midnight UTC
fn parse_due_date(input: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date_time| date_time.and_utc())
}

fn byte_offset(line: &str, char_index: usize) -> usize {
    line.char_indices()
        .nth(char_index)
        .map_or(line.len(), |(offset, _)| offset)
}

// Returns the UI content for the task edit dialog
pub fn get_task_edit_ui<'a>(app: &'a App) -> Vec<Line<'a>> {
    const GRAY_TEXT: Style = Style::new().fg(Color::Rgb(62, 62, 62));
    const WHITE_TEXT: Style = Style::new().fg(Color::White);
    const BLACK_ON_WHITE: Style = Style::new().fg(Color::Black).bg(Color::White);
    let dialog = &app.task_edit_dialog_state;
    let mut text = Vec::new();

    struct TextDialogInputLine<'b> {
        prefix: &'static str,
        placeholder: &'static str,
        value: &'b str,
    }

    // Define the lines (input fields) of the dialog
    let lines = [
        TextDialogInputLine {
            prefix: "Description: ",
            placeholder: "My task",
            value: dialog.line(DESCRIPTION_LINE),
        },
        TextDialogInputLine {
            prefix: "Due date:    ",
            placeholder: "23.11.2023",
            value: dialog.line(DUE_DATE_LINE),
        },
    ];

    let (cursor_x, cursor_y) = dialog.cursor_position;

    for (i, line) in lines.iter().enumerate() {
        let mut spans = vec![Span::styled(line.prefix, WHITE_TEXT)];

        if dialog.is_editing_existing() && i == DUE_DATE_LINE {
            // Due date cannot change after creation
            spans.push(Span::styled(format!("{} (fixed)", line.value), GRAY_TEXT));
        } else if line.value.is_empty() {
            if cursor_y == i {
                // Line is selected. First char is highlighted, the rest is gray
                spans.push(Span::styled(
                    line.placeholder.chars().take(1).collect::<String>(),
                    BLACK_ON_WHITE,
                ));
                spans.push(Span::styled(
                    line.placeholder.chars().skip(1).collect::<String>(),
                    GRAY_TEXT,
                ));
            } else {
                spans.push(Span::styled(line.placeholder, GRAY_TEXT));
            }
        } else if cursor_y == i {
            // All chars are white, except for the one at the cursor position which is highlighted
            spans.push(Span::styled(
                line.value.chars().take(cursor_x).collect::<String>(),
                WHITE_TEXT,
            ));
            spans.push(Span::styled(
                line.value.chars().skip(cursor_x).take(1).collect::<String>(),
                BLACK_ON_WHITE,
            ));
            spans.push(Span::styled(
                line.value.chars().skip(cursor_x + 1).collect::<String>(),
                WHITE_TEXT,
            ));

            if cursor_x == line.value.chars().count() {
                spans.push(Span::styled(" ", BLACK_ON_WHITE));
            }
        } else {
            spans.push(Span::styled(line.value, WHITE_TEXT));
        }

        text.push(Line::from(spans));
    }

    text.push(Line::raw(""));

    if let Some(ref error_message) = dialog.error_message {
        text.push(Line::from(vec![Span::styled(
            error_message.as_str(),
            Style::new().fg(Color::Red),
        )]));
        text.push(Line::raw(""));
    }

    text.push(Line::from(vec![Span::styled(
        "Enter - save, Esc - cancel",
        WHITE_TEXT,
    )]));

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::TodoStore;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn type_text(dialog: &mut TaskEditDialogState, text: &str) {
        for c in text.chars() {
            dialog.input(c);
        }
    }

    fn clear_line(dialog: &mut TaskEditDialogState) {
        while dialog.cursor_position.0 < dialog.line_length(dialog.cursor_position.1) {
            dialog.move_cursor_right();
        }
        while dialog.cursor_position.0 > 0 {
            dialog.delete_char();
        }
    }

    #[test]
    fn new_task_is_added_with_parsed_due_date() {
        let mut tasks = TaskList::with_store(TodoStore::default());
        let mut dialog = TaskEditDialogState::default();
        dialog.create_a_new_task();

        type_text(&mut dialog, "Buy milk");
        dialog.move_cursor_down();
        clear_line(&mut dialog);
        type_text(&mut dialog, "10.03.2025");

        let outcome = dialog.save_task(&mut tasks);
        assert_eq!(
            outcome,
            Some(Ok(Confirmation::Added {
                id: 1,
                description: "Buy milk".into()
            }))
        );
        assert!(!dialog.dialog_active);
        assert_eq!(
            tasks.store().list()[0].due_date,
            Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn malformed_date_keeps_dialog_open() {
        let mut tasks = TaskList::with_store(TodoStore::default());
        let mut dialog = TaskEditDialogState::default();
        dialog.create_a_new_task();
        type_text(&mut dialog, "Buy milk");
        dialog.move_cursor_down();
        clear_line(&mut dialog);
        type_text(&mut dialog, "2025-03-10");

        assert_eq!(dialog.save_task(&mut tasks), None);
        assert!(dialog.dialog_active);
        assert_eq!(
            dialog.error_message.as_deref(),
            Some("Date should be in format dd.mm.yyyy")
        );
        assert!(tasks.store().is_empty());
    }

    #[test]
    fn editing_changes_only_the_description() {
        let due = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
        let mut tasks = TaskList::with_store(TodoStore::new(vec![Task::new(1, "Finish project", due)]));
        let mut dialog = TaskEditDialogState::default();
        dialog.edit_task(&tasks.store().list()[0].clone());

        // Cursor cannot reach the due date line
        dialog.move_cursor_down();
        assert_eq!(dialog.cursor_position.1, DESCRIPTION_LINE);

        clear_line(&mut dialog);
        type_text(&mut dialog, "Complete TypeScript project");

        let outcome = dialog.save_task(&mut tasks);
        assert_eq!(
            outcome.map(|result| crate::app::message::render(&result)),
            Some("Task 1 updated to 'Complete TypeScript project'.".to_string())
        );
        assert_eq!(tasks.store().list()[0].due_date, due);
    }

    #[test]
    fn cursor_edits_multibyte_text() {
        let mut dialog = TaskEditDialogState::default();
        dialog.create_a_new_task();
        type_text(&mut dialog, "café");
        dialog.move_cursor_left();
        dialog.delete_char();
        assert_eq!(dialog.line(DESCRIPTION_LINE), "caé");

        dialog.input('f');
        assert_eq!(dialog.line(DESCRIPTION_LINE), "café");
        assert_eq!(dialog.cursor_position, (3, DESCRIPTION_LINE));
    }

    #[test]
    fn new_task_due_date_defaults_to_today() {
        let mut dialog = TaskEditDialogState::default();
        dialog.create_a_new_task();
        assert_eq!(
            dialog.line(DUE_DATE_LINE),
            Utc::now().format(DATE_FORMAT).to_string()
        );
    }
}
