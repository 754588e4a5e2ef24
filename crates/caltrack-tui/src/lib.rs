// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use caltrack_app::{
    Activity, ActivityAction, ActivityEvent, ActivityForm, ActivityState, AppCommand, AppMode,
    AppState, CalorieSummary, FormField, ListMode,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::time::{Duration, Instant};
use tracing::{info, warn};

const STATUS_TTL: Duration = Duration::from_secs(4);
const POLL_INTERVAL: Duration = Duration::from_millis(120);

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    form: ActivityForm,
    cursor: usize,
    help_visible: bool,
    confirm_reset: bool,
    status_expires_at: Option<Instant>,
}

pub fn run_app(state: &mut AppState, activities: &mut ActivityState) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    view_data.form.sync(activities);
    info!(
        activities = activities.activities.len(),
        list = state.list_mode.as_str(),
        "tui started"
    );

    let result = event_loop(&mut terminal, state, activities, &mut view_data);

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!(activities = activities.activities.len(), "tui exited");
    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    activities: &mut ActivityState,
    view_data: &mut ViewData,
) -> Result<()> {
    loop {
        expire_status(state, view_data, Instant::now());

        terminal
            .draw(|frame| render(frame, state, activities, view_data))
            .context("draw frame")?;

        if !event::poll(POLL_INTERVAL).context("poll event")? {
            continue;
        }
        if let Event::Key(key) = event::read().context("read event")?
            && key.kind == KeyEventKind::Press
            && handle_key_event(state, activities, view_data, key)
        {
            return Ok(());
        }
    }
}

fn emit_status(state: &mut AppState, view_data: &mut ViewData, message: impl Into<String>) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_expires_at = Some(Instant::now() + STATUS_TTL);
}

fn expire_status(state: &mut AppState, view_data: &mut ViewData, now: Instant) {
    if let Some(deadline) = view_data.status_expires_at
        && now >= deadline
    {
        view_data.status_expires_at = None;
        state.dispatch(AppCommand::ClearStatus);
    }
}

/// Runs one activity transition and brings the form and list cursor back in
/// line with the resulting state.
fn dispatch_activity(
    state: &AppState,
    activities: &mut ActivityState,
    view_data: &mut ViewData,
    action: ActivityAction,
) -> Vec<ActivityEvent> {
    let events = activities.dispatch(action);
    view_data.form.sync(activities);
    clamp_cursor(state, activities, view_data);
    events
}

fn handle_key_event(
    state: &mut AppState,
    activities: &mut ActivityState,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
            emit_status(state, view_data, "help hidden");
        }
        return false;
    }

    if view_data.confirm_reset {
        view_data.confirm_reset = false;
        if key.code == KeyCode::Char('y') {
            let events = dispatch_activity(state, activities, view_data, ActivityAction::Reset);
            let removed = events
                .iter()
                .find_map(|event| match event {
                    ActivityEvent::Reset { removed } => Some(*removed),
                    _ => None,
                })
                .unwrap_or(0);
            info!(removed, "activities reset");
            emit_status(state, view_data, format!("reset; removed {removed}"));
        } else {
            emit_status(state, view_data, "reset canceled");
        }
        return false;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, activities, view_data, key),
        AppMode::Form => handle_form_key(state, activities, view_data, key),
    }
    false
}

fn handle_nav_key(
    state: &mut AppState,
    activities: &mut ActivityState,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('?'), _) => {
            view_data.help_visible = true;
            emit_status(state, view_data, "help open");
        }
        (KeyCode::Char('j') | KeyCode::Down, _) => move_cursor(state, activities, view_data, 1),
        (KeyCode::Char('k') | KeyCode::Up, _) => move_cursor(state, activities, view_data, -1),
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => {
            view_data.cursor = 0;
        }
        (KeyCode::Char('G'), _) | (KeyCode::End, _) => {
            view_data.cursor = activities.filtered(state.list_mode).len().saturating_sub(1);
        }
        (KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('f') | KeyCode::Char('b'), _) => {
            state.dispatch(AppCommand::ToggleListMode);
            view_data.cursor = 0;
            let label = state.list_mode.as_str();
            emit_status(state, view_data, format!("showing {label}"));
        }
        (KeyCode::Char('i') | KeyCode::Char('a'), KeyModifiers::NONE) => {
            state.dispatch(AppCommand::FocusForm);
            let status = field_status(&view_data.form);
            emit_status(state, view_data, status);
        }
        (KeyCode::Char('e'), KeyModifiers::NONE) | (KeyCode::Enter, _) => {
            edit_selected(state, activities, view_data);
        }
        (KeyCode::Char('d'), KeyModifiers::NONE) | (KeyCode::Delete, _) => {
            delete_selected(state, activities, view_data);
        }
        (KeyCode::Char('R'), _) => {
            if activities.activities.is_empty() {
                emit_status(state, view_data, "nothing to reset");
            } else {
                view_data.confirm_reset = true;
                emit_status(state, view_data, "reset all activities? y to confirm");
            }
        }
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ClearStatus);
        }
        _ => {}
    }
}

fn handle_form_key(
    state: &mut AppState,
    activities: &mut ActivityState,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ExitToNav);
        }
        (KeyCode::Char('s'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            submit_form(state, activities, view_data);
        }
        (KeyCode::Enter, _) => submit_form(state, activities, view_data),
        (KeyCode::Tab | KeyCode::Down, _) => {
            view_data.form.move_field(1);
            let status = field_status(&view_data.form);
            emit_status(state, view_data, status);
        }
        (KeyCode::BackTab | KeyCode::Up, _) => {
            view_data.form.move_field(-1);
            let status = field_status(&view_data.form);
            emit_status(state, view_data, status);
        }
        (KeyCode::Left, _) => cycle_choice(state, view_data, -1),
        (KeyCode::Right, _) => cycle_choice(state, view_data, 1),
        (KeyCode::Backspace, _) => {
            view_data.form.backspace();
        }
        (KeyCode::Char(ch), modifiers) if !modifiers.contains(KeyModifiers::CONTROL) => {
            type_char(state, view_data, ch);
        }
        _ => {}
    }
}

fn type_char(state: &mut AppState, view_data: &mut ViewData, ch: char) {
    let field = view_data.form.field();
    if !field.has_choices() {
        if !view_data.form.push_char(ch) && field == FormField::Calories {
            emit_status(state, view_data, "calories take digits only");
        }
        return;
    }

    let Some(digit) = ch.to_digit(10).filter(|digit| *digit >= 1) else {
        emit_status(
            state,
            view_data,
            format!("use 1-9 or left/right to choose {}", field.label()),
        );
        return;
    };
    let status = match view_data.form.choose(digit as usize - 1) {
        Some(choice) => format!("{} {choice}", field.label()),
        None => format!("choice {digit} unavailable"),
    };
    emit_status(state, view_data, status);
}

fn cycle_choice(state: &mut AppState, view_data: &mut ViewData, delta: isize) {
    let field = view_data.form.field();
    let status = match view_data.form.cycle(delta) {
        Some(choice) => format!("{} {choice}", field.label()),
        None => format!("no choices for {}", field.label()),
    };
    emit_status(state, view_data, status);
}

fn submit_form(state: &mut AppState, activities: &mut ActivityState, view_data: &mut ViewData) {
    let activity = match view_data.form.submit() {
        Ok(activity) => activity,
        Err(error) => {
            warn!(%error, "save rejected by form validation");
            emit_status(state, view_data, format!("form invalid: {error}"));
            return;
        }
    };

    let id = activity.id;
    let name = activity.name.clone();
    let list_mode = activity.category.list_mode();
    let events = dispatch_activity(state, activities, view_data, ActivityAction::Save(activity));
    let verb = if events.contains(&ActivityEvent::Updated(id)) {
        "updated"
    } else {
        "added"
    };
    info!(activity = %id, verb, "activity saved");

    state.dispatch(AppCommand::SetListMode(list_mode));
    state.dispatch(AppCommand::ExitToNav);
    view_data.cursor = activities
        .filtered(list_mode)
        .iter()
        .position(|activity| activity.id == id)
        .unwrap_or(0);
    emit_status(state, view_data, format!("{verb} {name}"));
}

fn edit_selected(state: &mut AppState, activities: &mut ActivityState, view_data: &mut ViewData) {
    let Some((id, name)) = selected_activity(state, activities, view_data)
        .map(|activity| (activity.id, activity.name.clone()))
    else {
        emit_status(state, view_data, "no activity selected");
        return;
    };

    dispatch_activity(
        state,
        activities,
        view_data,
        ActivityAction::SelectForEdit(id),
    );
    state.dispatch(AppCommand::FocusForm);
    emit_status(state, view_data, format!("editing {name}"));
}

fn delete_selected(state: &mut AppState, activities: &mut ActivityState, view_data: &mut ViewData) {
    let Some((id, name)) = selected_activity(state, activities, view_data)
        .map(|activity| (activity.id, activity.name.clone()))
    else {
        emit_status(state, view_data, "no activity selected");
        return;
    };

    let events = dispatch_activity(state, activities, view_data, ActivityAction::Delete(id));
    if events.contains(&ActivityEvent::NotFound(id)) {
        emit_status(state, view_data, format!("activity {} not found", id.short()));
        return;
    }
    info!(activity = %id, "activity deleted");
    emit_status(state, view_data, format!("deleted {name}"));
}

fn selected_activity<'a>(
    state: &AppState,
    activities: &'a ActivityState,
    view_data: &ViewData,
) -> Option<&'a Activity> {
    activities
        .filtered(state.list_mode)
        .get(view_data.cursor)
        .copied()
}

fn move_cursor(state: &AppState, activities: &ActivityState, view_data: &mut ViewData, delta: isize) {
    let len = activities.filtered(state.list_mode).len();
    if len == 0 {
        view_data.cursor = 0;
        return;
    }
    let next = (view_data.cursor as isize + delta).clamp(0, len as isize - 1);
    view_data.cursor = next as usize;
}

fn clamp_cursor(state: &AppState, activities: &ActivityState, view_data: &mut ViewData) {
    let len = activities.filtered(state.list_mode).len();
    view_data.cursor = view_data.cursor.min(len.saturating_sub(1));
}

fn field_status(form: &ActivityForm) -> String {
    let field = form.field();
    let index = FormField::ALL
        .iter()
        .position(|candidate| *candidate == field)
        .unwrap_or(0);
    format!(
        "field {} ({}/{})",
        field.label(),
        index + 1,
        FormField::ALL.len()
    )
}

fn render(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    activities: &ActivityState,
    view_data: &ViewData,
) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(summary_text(activities.summary()))
        .block(Block::default().title("caltrack").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[1]);

    let form_border = if state.mode == AppMode::Form {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let form = Paragraph::new(render_form_text(&view_data.form, state.mode)).block(
        Block::default()
            .title(form_title(&view_data.form))
            .borders(Borders::ALL)
            .border_style(form_border),
    );
    frame.render_widget(form, body[0]);

    render_list(frame, body[1], state, activities, view_data);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if view_data.help_visible {
        let area = centered_rect(70, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_list(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    activities: &ActivityState,
    view_data: &ViewData,
) {
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let titles = ListMode::ALL
        .iter()
        .map(|mode| format!("{} ({})", mode.as_str(), activities.filtered(*mode).len()))
        .collect::<Vec<String>>();
    let selected = ListMode::ALL
        .iter()
        .position(|mode| *mode == state.list_mode)
        .unwrap_or(0);
    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(list_mode_color(state.list_mode))
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, split[0]);

    let visible = activities.filtered(state.list_mode);
    if visible.is_empty() {
        let empty = Paragraph::new(empty_list_text(state.list_mode)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.list_mode.as_str()),
        );
        frame.render_widget(empty, split[1]);
        return;
    }

    let header = Row::new(["name", "calories", "details"].map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));

    let rows = visible.iter().enumerate().map(|(index, activity)| {
        let mut style = Style::default();
        if index == view_data.cursor {
            style = style.bg(Color::DarkGray);
            if state.mode == AppMode::Nav {
                style = style.add_modifier(Modifier::BOLD);
            }
        }
        Row::new(
            activity_cells(activity)
                .into_iter()
                .map(Cell::from)
                .collect::<Vec<_>>(),
        )
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(35),
            Constraint::Length(10),
            Constraint::Min(8),
        ],
    )
    .header(header)
    .column_spacing(1)
    .block(
        Block::default()
            .title(state.list_mode.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(list_mode_color(state.list_mode))),
    );
    frame.render_widget(table, split[1]);
}

fn activity_cells(activity: &Activity) -> [String; 3] {
    [
        activity.name.clone(),
        format!("{} kcal", activity.calories),
        activity.details().unwrap_or("").to_owned(),
    ]
}

fn list_mode_color(mode: ListMode) -> Color {
    match mode {
        ListMode::Food => Color::Green,
        ListMode::Exercise => Color::Blue,
    }
}

fn summary_text(summary: CalorieSummary) -> String {
    format!(
        "consumed {} | burned {} | net {}",
        summary.consumed,
        summary.burned,
        summary.net()
    )
}

fn empty_list_text(mode: ListMode) -> String {
    format!("no {} yet...", mode.as_str())
}

fn form_title(form: &ActivityForm) -> String {
    match form.editing() {
        Some(id) => format!("edit activity {}", id.short()),
        None => "new activity".to_owned(),
    }
}

fn render_form_text(form: &ActivityForm, mode: AppMode) -> String {
    let draft = form.draft();
    let mut lines = FormField::ALL
        .iter()
        .map(|field| {
            let marker = if mode == AppMode::Form && form.field() == *field {
                ">"
            } else {
                " "
            };
            let value = match field {
                FormField::Category => format!("{} (1 food, 2 exercise)", draft.category.label()),
                FormField::Name if draft.name.is_empty() => "(choose)".to_owned(),
                FormField::Name => draft.name.clone(),
                FormField::Calories if form.calories_input().is_empty() => {
                    "0 (e.g. 300 or 500)".to_owned()
                }
                FormField::Calories => form.calories_input().to_owned(),
                FormField::Details if draft.details.is_empty() => "-".to_owned(),
                FormField::Details => draft.details.clone(),
            };
            format!("{marker} {:<9} {value}", field.label())
        })
        .collect::<Vec<String>>();

    lines.push(String::new());
    lines.push(format!("{} options:", draft.category.label()));
    lines.extend(
        form.name_options()
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let chosen = if option.name == draft.name { "*" } else { " " };
                match option.details {
                    Some(details) => format!(" {chosen}{} {} ({details})", index + 1, option.name),
                    None => format!(" {chosen}{} {}", index + 1, option.name),
                }
            }),
    );

    lines.push(String::new());
    match form.validate() {
        Ok(()) => lines.push(format!("[ {} ]", form.save_label())),
        Err(error) => lines.push(format!("[ {} ] disabled: {error}", form.save_label())),
    }
    lines.join("\n")
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mut parts = Vec::new();
    match state.mode {
        AppMode::Nav => parts.push("NAV".to_owned()),
        AppMode::Form => {
            parts.push("FORM".to_owned());
            parts.push(field_status(&view_data.form));
        }
    }
    if let Some(status) = &state.status_line {
        parts.push(status.clone());
    }
    parts.push(
        match state.mode {
            AppMode::Nav => {
                "j/k move | tab food/exercise | i form | e edit | d delete | R reset | ? help | ctrl+q quit"
            }
            AppMode::Form => "tab field | 1-9 or left/right choose | enter save | esc list | ctrl+q quit",
        }
        .to_owned(),
    );
    parts.join(" | ")
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit\n\
list: j/k or up/down move | g/G first/last | tab/f/b food or exercise\n\
list: i form | e/enter edit selected | d delete selected | R reset all (y confirms) | ? help\n\
form: tab/shift+tab field | 1-9 choose | left/right cycle | type calories/details\n\
form: enter or ctrl+s save (needs a name and calories above zero) | esc back to list"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
