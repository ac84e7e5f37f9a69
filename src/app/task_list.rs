use chrono::{DateTime, Utc};
use now::DateTimeNow;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use std::ops::Add;

use ratatui::widgets::*;

use crate::app::message::Confirmation;
use crate::app::models::{Task, TaskId};
use crate::app::store::{StoreError, TodoStore};

use super::ui::App;

// Which tasks the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionFilter {
    #[default]
    All,
    Open,
    Done,
}

impl CompletionFilter {
    pub fn next(self) -> CompletionFilter {
        match self {
            CompletionFilter::All => CompletionFilter::Open,
            CompletionFilter::Open => CompletionFilter::Done,
            CompletionFilter::Done => CompletionFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CompletionFilter::All => "All",
            CompletionFilter::Open => "Open",
            CompletionFilter::Done => "Done",
        }
    }
}

// The task list is the single owner of the store; every UI action goes through it
pub struct TaskList {
    pub state: ListState,
    store: TodoStore,
    filter: CompletionFilter,
}

impl TaskList {
    pub fn with_store(store: TodoStore) -> TaskList {
        TaskList {
            state: ListState::default(),
            store,
            filter: CompletionFilter::All,
        }
    }

    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    pub fn filter(&self) -> CompletionFilter {
        self.filter
    }

    // Tasks currently shown, in store order
    pub fn visible(&self) -> Vec<&Task> {
        match self.filter {
            CompletionFilter::All => self.store.list().iter().collect(),
            CompletionFilter::Open => self.store.filter_by_completion(false),
            CompletionFilter::Done => self.store.filter_by_completion(true),
        }
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.clamp_selection();
    }

    // Move the selection to the next item
    pub fn next(&mut self) {
        let len = self.visible().len();
        let i = match self.state.selected() {
            Some(i) => {
                if len == 0 || i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    // Move the selection to the previous item
    pub fn previous(&mut self) {
        let len = self.visible().len();
        let i = match self.state.selected() {
            Some(i) => {
                if len == 0 {
                    0
                } else if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn unselect(&mut self) {
        self.state.select(None);
    }

    // Get the selected task
    pub fn get_selected(&self) -> Option<&Task> {
        let i = self.state.selected()?;
        self.visible().get(i).copied()
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.get_selected().map(|task| task.id)
    }

    pub fn add(
        &mut self,
        description: impl Into<String>,
        due_date: DateTime<Utc>,
    ) -> Result<Confirmation, StoreError> {
        self.store.add(description, due_date)
    }

    pub fn update_description(
        &mut self,
        id: TaskId,
        description: impl Into<String>,
    ) -> Result<Confirmation, StoreError> {
        self.store.update_description(id, description)
    }

    // Mark the selected task as completed; None when nothing is selected
    pub fn complete_selected(&mut self) -> Option<Result<Confirmation, StoreError>> {
        let id = self.selected_id()?;
        let outcome = self.store.complete(id);
        self.clamp_selection();
        Some(outcome)
    }

    // Remove the selected task from the store
    pub fn delete_selected(&mut self) -> Option<Result<Confirmation, StoreError>> {
        let id = self.selected_id()?;
        let outcome = self.store.remove(id);
        self.clamp_selection();
        Some(outcome)
    }

    pub fn clear_completed(&mut self) -> Confirmation {
        let confirmation = self.store.clear_completed();
        self.clamp_selection();
        confirmation
    }

    // Keep the selection inside the visible rows after the rows changed
    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        match self.state.selected() {
            Some(_) if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            _ => {}
        }
    }

    // Get the uncompleted tasks
    pub fn get_uncompleted(&self) -> Vec<&Task> {
        self.store.filter_by_completion(false)
    }

    // Get the tasks due next week
    pub fn get_due_next_week(&self) -> Vec<&Task> {
        let next_week = Utc::now().add(chrono::Duration::weeks(1));
        self.get_uncompleted()
            .into_iter()
            .filter(|task| task.due_date < next_week)
            .collect()
    }

    // Get the late tasks
    pub fn get_late(&self) -> Vec<&Task> {
        let start_of_today = Utc::now().beginning_of_day();
        self.get_uncompleted()
            .into_iter()
            .filter(|task| task.due_date < start_of_today)
            .collect()
    }
}

// Build the UI (list) for task list
pub fn get_list_items_ui<'a>(tasks: &[&'a Task]) -> Vec<ListItem<'a>> {
    tasks
        .iter()
        .map(|task| {
            let mut lines = Vec::new();

            let description_color = if task.completed {
                Color::DarkGray
            } else {
                Color::White
            };

            lines.push(Line::from(vec![
                Span::from(if task.completed { "[✓] " } else { "[ ] " }),
                Span::from(format!("#{} ", task.id)),
                Span::from(task.description.as_str()).fg(description_color),
            ]));

            lines.push(Line::from(vec![Span::from(format!(
                "    Due: {}",
                task.due_date.format("%d.%m.%Y")
            ))]));
            ListItem::new(lines).style(Style::default().fg(Color::White))
        })
        .collect()
}

// Build the UI (lines) for statistics infobox
pub fn get_statistics_ui<'a>(app: &App) -> Vec<Line<'a>> {
    vec![
        Line::from(format!("Total tasks: {}", app.items.store().len())),
        Line::from(format!(
            "Uncompleted tasks: {}",
            app.items.get_uncompleted().len()
        )),
        Line::from(format!(
            "Due next week: {}",
            app.items.get_due_next_week().len()
        )),
        Line::from(format!("Late: {}", app.items.get_late().len())),
        Line::from(format!("Showing: {}", app.items.filter().label())),
    ]
}

// Build the UI (lines) for instructions infobox
pub fn get_instructions_ui<'a>() -> Vec<Line<'a>> {
    vec![
        "Enter - mark as done".into(),
        "a - add a task".into(),
        "e - edit description".into(),
        "x - delete a task".into(),
        "c - clear completed".into(),
        "f - cycle filter all/open/done".into(),
        "q - quit".into(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use pretty_assertions::assert_eq;

    fn list_with(tasks: Vec<Task>) -> TaskList {
        TaskList::with_store(TodoStore::new(tasks))
    }

    fn ids(tasks: &[&Task]) -> Vec<TaskId> {
        tasks.iter().map(|task| task.id).collect()
    }

    fn sample() -> TaskList {
        let now = Utc::now();
        let mut done = Task::new(2, "done", now);
        done.completed = true;
        list_with(vec![
            Task::new(1, "open", now),
            done,
            Task::new(3, "also open", now),
        ])
    }

    #[test]
    fn filter_cycles_through_subsets() {
        let mut list = sample();
        assert_eq!(ids(&list.visible()), vec![1, 2, 3]);

        list.cycle_filter();
        assert_eq!(list.filter(), CompletionFilter::Open);
        assert_eq!(ids(&list.visible()), vec![1, 3]);

        list.cycle_filter();
        assert_eq!(ids(&list.visible()), vec![2]);

        list.cycle_filter();
        assert_eq!(list.filter(), CompletionFilter::All);
    }

    #[test]
    fn selection_wraps_around() {
        let mut list = sample();
        list.previous();
        assert_eq!(list.state.selected(), Some(0));
        list.previous();
        assert_eq!(list.state.selected(), Some(2));
        list.next();
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn selection_follows_the_filter() {
        let mut list = sample();
        list.cycle_filter();
        list.next();
        list.next();
        assert_eq!(list.get_selected().map(|task| task.id), Some(3));
    }

    #[test]
    fn completing_last_open_row_clamps_selection() {
        let mut list = sample();
        list.cycle_filter();
        list.next();
        list.next();

        let outcome = list.complete_selected();
        assert!(matches!(outcome, Some(Ok(Confirmation::Completed { id: 3, .. }))));
        assert_eq!(ids(&list.visible()), vec![1]);
        assert_eq!(list.state.selected(), Some(0));
    }

    #[test]
    fn actions_without_selection_do_nothing() {
        let mut list = sample();
        assert_eq!(list.complete_selected(), None);
        assert_eq!(list.delete_selected(), None);
        assert_eq!(list.store().len(), 3);
    }

    #[test]
    fn delete_selected_removes_from_store() {
        let mut list = sample();
        list.next();
        list.next();

        let outcome = list.delete_selected();
        assert!(matches!(outcome, Some(Ok(Confirmation::Removed { ref task })) if task.id == 2));
        assert_eq!(ids(&list.visible()), vec![1, 3]);
    }

    #[test]
    fn statistics_count_only_open_tasks() {
        let now = Utc::now();
        let mut late_but_done = Task::new(3, "late but done", now - Duration::days(10));
        late_but_done.completed = true;
        let list = list_with(vec![
            Task::new(1, "late", now - Duration::days(3)),
            Task::new(2, "far away", now + Duration::weeks(4)),
            late_but_done,
        ]);

        assert_eq!(ids(&list.get_uncompleted()), vec![1, 2]);
        assert_eq!(ids(&list.get_due_next_week()), vec![1]);
        assert_eq!(ids(&list.get_late()), vec![1]);
    }
}
