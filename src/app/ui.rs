use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{prelude::*, widgets::*};
use std::{
    io,
    time::{Duration, Instant},
};
use tracing::info;

use crate::app::message::{render, Confirmation};
use crate::app::store::{StoreError, TodoStore};
use crate::app::{task_edit::*, task_list::*};

pub struct App {
    pub items: TaskList,
    pub task_edit_dialog_state: TaskEditDialogState,
    // Rendered outcome of the last store operation
    pub status: Option<String>,
}

impl App {
    pub fn new(store: TodoStore) -> App {
        App {
            items: TaskList::with_store(store),
            task_edit_dialog_state: TaskEditDialogState::default(),
            status: None,
        }
    }

    fn report(&mut self, outcome: Option<Result<Confirmation, StoreError>>) {
        if let Some(outcome) = outcome {
            self.status = Some(render(&outcome));
        }
    }
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| draw_ui(f, &mut app))?;
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if crossterm::event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.task_edit_dialog_state.dialog_active {
                        // Handle input for the task edit dialog
                        match key.code {
                            KeyCode::Down => app.task_edit_dialog_state.move_cursor_down(),
                            KeyCode::Up => app.task_edit_dialog_state.move_cursor_up(),
                            KeyCode::Esc => app.task_edit_dialog_state.cancel(),
                            KeyCode::Enter => {
                                let outcome = app.task_edit_dialog_state.save_task(&mut app.items);
                                app.report(outcome);
                            }
                            KeyCode::Left => app.task_edit_dialog_state.move_cursor_left(),
                            KeyCode::Right => app.task_edit_dialog_state.move_cursor_right(),
                            KeyCode::Backspace => app.task_edit_dialog_state.delete_char(),
                            KeyCode::Char(to_insert) => app.task_edit_dialog_state.input(to_insert),
                            _ => {}
                        }
                    } else {
                        // Handle input for the task list navigation, filtering and state change
                        match key.code {
                            KeyCode::Char('q') => {
                                info!(tasks = app.items.store().len(), "quitting");
                                return Ok(());
                            }
                            KeyCode::Char('x') => {
                                let outcome = app.items.delete_selected();
                                app.report(outcome);
                            }
                            KeyCode::Char('c') => {
                                let confirmation = app.items.clear_completed();
                                app.report(Some(Ok(confirmation)));
                            }
                            KeyCode::Char('f') => app.items.cycle_filter(),
                            KeyCode::Left => app.items.unselect(),
                            KeyCode::Down => app.items.next(),
                            KeyCode::Up => app.items.previous(),
                            KeyCode::Char('a') => app.task_edit_dialog_state.create_a_new_task(),
                            KeyCode::Char('e') => {
                                if let Some(task) = app.items.get_selected() {
                                    app.task_edit_dialog_state.edit_task(task);
                                }
                            }
                            KeyCode::Enter => {
                                let outcome = app.items.complete_selected();
                                app.report(outcome);
                            }
                            _ => {}
                        }
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }
}

// Draws the whole user interface
fn draw_ui(f: &mut Frame, app: &mut App) {
    // Status line at the bottom, the rest split 60-40
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(f.size());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    // DRAW LEFT PART
    // Create a List from the visible tasks and highlight the currently selected one
    let visible = app.items.visible();
    let task_list = List::new(get_list_items_ui(&visible))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("List ({})", app.items.filter().label())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::LightGreen)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");

    let mut list_state = app.items.state.clone();
    f.render_stateful_widget(task_list, chunks[0], &mut list_state);

    // DRAW RIGHT PART
    if app.task_edit_dialog_state.dialog_active {
        let title = if app.task_edit_dialog_state.is_editing_existing() {
            "Edit Task"
        } else {
            "Add Task"
        };
        let create_or_edit_task = Paragraph::new(get_task_edit_ui(app))
            .block(Block::new().title(title).borders(Borders::ALL))
            .style(Style::new().white());

        f.render_widget(create_or_edit_task, chunks[1]);
    } else {
        // If not editing, display statistics and instructions in vertically split layout
        let right_side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        let instructions = Paragraph::new(get_instructions_ui())
            .block(Block::new().title("Commands").borders(Borders::ALL))
            .style(Style::new().white());

        let statistics = Paragraph::new(get_statistics_ui(app))
            .block(Block::new().title("Statistics").borders(Borders::ALL))
            .style(Style::new().white());

        f.render_widget(instructions, right_side[0]);
        f.render_widget(statistics, right_side[1]);
    }

    let status = Paragraph::new(app.status.clone().unwrap_or_default())
        .block(Block::new().title("Status").borders(Borders::ALL))
        .style(Style::new().white());
    f.render_widget(status, rows[1]);

    // Offset may have scrolled while rendering
    app.items.state = list_state;
}
