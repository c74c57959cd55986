// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use rentwise_app::{
    AppCommand, AppEvent, AppState, ChatRole, ChatUpdate, ConfigStep, ContentView, FocusIntent,
    IndicatorContent, LabelView, Pane, SeparatorView, StepStatus, StepperError,
    StepperOrientation, TriggerView, WizardScope, trigger_handle,
};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

const CURSOR_MARK: &str = "›";
const HORIZONTAL_SEPARATOR: &str = " ── ";
const VERTICAL_SEPARATOR: &str = "  │";
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

pub trait AppRuntime {
    /// Short label for the title bar, e.g. the booking being configured.
    fn title(&self) -> String;
    fn start_session(&mut self) -> Result<()>;
    fn send_chat(&mut self, message: &str, history: &[(ChatRole, String)]) -> Result<ChatUpdate>;
    fn spawn_chat(
        &mut self,
        request_id: u64,
        message: &str,
        history: &[(ChatRole, String)],
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let outcome = self
            .send_chat(message, history)
            .map_err(|error| format!("{error:#}"));
        tx.send(InternalEvent::ChatFinished {
            request_id,
            outcome,
        })
        .map_err(|_| anyhow!("chat event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    ChatFinished {
        request_id: u64,
        outcome: Result<ChatUpdate, String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOptions {
    pub show_chat: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self { show_chat: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ViewData {
    title: String,
    options: UiOptions,
    chat_input: String,
    in_flight: Option<u64>,
    next_request_id: u64,
    status_token: u64,
    help_visible: bool,
}

pub fn run_app<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    options: UiOptions,
) -> Result<()> {
    let mut view_data = ViewData {
        title: runtime.title(),
        options,
        ..ViewData::default()
    };
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = runtime.start_session() {
        emit_status(
            state,
            &mut view_data,
            &internal_tx,
            format!("chat unavailable: {error:#}"),
        );
    }
    if !view_data.options.show_chat && state.pane == Pane::Chat {
        state.dispatch(AppCommand::NextPane);
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    info!(title = %view_data.title, "ui started");

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);
        state.sync_triggers();

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(has_event) => has_event,
            Err(error) => {
                result = Err(error);
                break;
            }
        };
        if has_event {
            match event::read().context("read event") {
                Ok(Event::Key(key)) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!("ui stopped");
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::ChatFinished {
                request_id,
                outcome,
            } => handle_chat_finished(state, view_data, tx, request_id, outcome),
        }
    }
}

fn handle_chat_finished(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    request_id: u64,
    outcome: Result<ChatUpdate, String>,
) {
    if view_data.in_flight != Some(request_id) {
        debug!(request_id, "dropping stale chat result");
        return;
    }
    view_data.in_flight = None;

    let command = match outcome {
        Ok(update) => AppCommand::ChatReplied(update),
        Err(error) => AppCommand::ChatFailed(error),
    };
    dispatch_with_status(state, view_data, tx, command);
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn dispatch_with_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) -> Vec<AppEvent> {
    let events = state.dispatch(command);
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
    events
}

/// Returns true when the app should quit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
    {
        return true;
    }

    if view_data.help_visible {
        view_data.help_visible = false;
        return false;
    }

    if state.review_open {
        let command = match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('r') => Some(AppCommand::CloseReview),
            KeyCode::Enter | KeyCode::Char('f') => Some(AppCommand::Finalize),
            _ => None,
        };
        if let Some(command) = command {
            dispatch_with_status(state, view_data, internal_tx, command);
        }
        return false;
    }

    match key.code {
        KeyCode::Tab => {
            rotate_pane(state, view_data, AppCommand::NextPane);
            return false;
        }
        KeyCode::BackTab => {
            rotate_pane(state, view_data, AppCommand::PrevPane);
            return false;
        }
        _ => {}
    }

    match state.pane {
        Pane::Chat => handle_chat_key(state, runtime, view_data, internal_tx, key),
        Pane::Stepper => handle_stepper_key(state, view_data, internal_tx, key),
        Pane::Content => handle_content_key(state, view_data, internal_tx, key),
    }
    false
}

fn rotate_pane(state: &mut AppState, view_data: &ViewData, command: AppCommand) {
    state.dispatch(command.clone());
    if !view_data.options.show_chat && state.pane == Pane::Chat {
        state.dispatch(command);
    }
}

fn handle_shared_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Char('n') => AppCommand::NextStep,
        KeyCode::Char('p') => AppCommand::PrevStep,
        KeyCode::Char('r') => AppCommand::OpenReview,
        KeyCode::Char('?') => {
            view_data.help_visible = true;
            return;
        }
        _ => return,
    };
    dispatch_with_status(state, view_data, internal_tx, command);
}

fn focus_intent_for_key(orientation: StepperOrientation, code: KeyCode) -> Option<FocusIntent> {
    match (orientation, code) {
        (StepperOrientation::Horizontal, KeyCode::Right)
        | (StepperOrientation::Vertical, KeyCode::Down) => Some(FocusIntent::Next),
        (StepperOrientation::Horizontal, KeyCode::Left)
        | (StepperOrientation::Vertical, KeyCode::Up) => Some(FocusIntent::Previous),
        (_, KeyCode::Home) => Some(FocusIntent::First),
        (_, KeyCode::End) => Some(FocusIntent::Last),
        _ => None,
    }
}

fn handle_stepper_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if let Some(intent) = focus_intent_for_key(state.wizard.orientation(), key.code) {
        state.dispatch(AppCommand::MoveFocus(intent));
        return;
    }
    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => {
            dispatch_with_status(state, view_data, internal_tx, AppCommand::ActivateFocused);
        }
        _ => handle_shared_key(state, view_data, internal_tx, key),
    }
}

fn handle_content_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let command = match key.code {
        KeyCode::Down | KeyCode::Char('j') => AppCommand::CursorDown,
        KeyCode::Up | KeyCode::Char('k') => AppCommand::CursorUp,
        KeyCode::Enter | KeyCode::Char(' ') => AppCommand::ChooseAtCursor,
        _ => {
            handle_shared_key(state, view_data, internal_tx, key);
            return;
        }
    };
    dispatch_with_status(state, view_data, internal_tx, command);
}

fn handle_chat_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Enter => submit_chat_input(state, runtime, view_data, internal_tx),
        KeyCode::Backspace => {
            view_data.chat_input.pop();
        }
        KeyCode::Esc => view_data.chat_input.clear(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.chat_input.push(ch);
        }
        _ => {}
    }
}

fn submit_chat_input<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let input = std::mem::take(&mut view_data.chat_input);
    let events = dispatch_with_status(
        state,
        view_data,
        internal_tx,
        AppCommand::ChatSubmitted(input.clone()),
    );
    if !events.contains(&AppEvent::ChatPendingChanged(true)) {
        if !events.is_empty() {
            view_data.chat_input = input;
        }
        return;
    }

    view_data.next_request_id = view_data.next_request_id.saturating_add(1);
    let request_id = view_data.next_request_id;
    view_data.in_flight = Some(request_id);
    let history = state.transcript.history();
    debug!(request_id, history = history.len(), "chat request queued");

    if let Err(error) = runtime.spawn_chat(request_id, input.trim(), &history, internal_tx.clone()) {
        view_data.in_flight = None;
        dispatch_with_status(
            state,
            view_data,
            internal_tx,
            AppCommand::ChatFailed(format!("{error:#}")),
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StripEntry {
    trigger: TriggerView,
    indicator: String,
    title: LabelView<'static>,
    description: LabelView<'static>,
    separator: Option<SeparatorView>,
}

fn strip_entries(state: &AppState) -> Result<Vec<StripEntry>, StepperError> {
    let scope = WizardScope::new(&state.wizard);
    let steps = state.visible_steps();
    let last = steps.len().saturating_sub(1);
    steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let number = step.number();
            let indicator = match scope.indicator(number)?.content {
                IndicatorContent::Override(glyph) => glyph.clone(),
                IndicatorContent::Ordinal(ordinal) => ordinal.to_string(),
            };
            let separator = if index < last {
                Some(scope.separator(number)?)
            } else {
                None
            };
            Ok(StripEntry {
                trigger: scope.trigger(number, trigger_handle(number))?,
                indicator,
                title: scope.title(number, step.title())?,
                description: scope.description(number, step.description())?,
                separator,
            })
        })
        .collect()
}

fn status_style(status: StepStatus) -> Style {
    match status {
        StepStatus::Active => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        StepStatus::Completed => Style::default().fg(Color::Green),
        StepStatus::Inactive => Style::default().fg(Color::Gray),
        StepStatus::Loading => Style::default().fg(Color::Yellow),
    }
}

fn trigger_style(trigger: &TriggerView) -> Style {
    let mut style = status_style(trigger.status);
    if trigger.loading {
        style = style.fg(Color::Yellow);
    }
    if trigger.disabled {
        style = style.fg(Color::DarkGray);
    }
    if trigger.focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

fn trigger_spans(entry: &StripEntry) -> Vec<Span<'static>> {
    let style = trigger_style(&entry.trigger);
    let marker = if entry.trigger.tab_stop { CURSOR_MARK } else { " " };
    vec![
        Span::raw(marker),
        Span::styled(format!("[{}]", entry.indicator), style),
        Span::raw(" "),
        Span::styled(entry.title.text, status_style(entry.title.status)),
    ]
}

fn strip_lines(entries: &[StripEntry], orientation: StepperOrientation) -> Vec<Line<'static>> {
    match orientation {
        StepperOrientation::Horizontal => {
            let mut spans = Vec::new();
            for entry in entries {
                spans.extend(trigger_spans(entry));
                if let Some(separator) = entry.separator {
                    spans.push(Span::styled(
                        HORIZONTAL_SEPARATOR,
                        status_style(separator.status),
                    ));
                }
            }
            vec![Line::from(spans)]
        }
        StepperOrientation::Vertical => {
            let mut lines = Vec::new();
            for entry in entries {
                lines.push(Line::from(trigger_spans(entry)));
                lines.push(Line::from(Span::styled(
                    format!("     {}", entry.description.text),
                    status_style(entry.description.status).add_modifier(Modifier::DIM),
                )));
                if let Some(separator) = entry.separator {
                    lines.push(Line::from(Span::styled(
                        VERTICAL_SEPARATOR,
                        status_style(separator.status),
                    )));
                }
            }
            lines
        }
    }
}

fn line_text(line: &Line<'_>) -> String {
    line.spans
        .iter()
        .map(|span| span.content.as_ref())
        .collect()
}

fn render_stepper_text(state: &AppState) -> Result<String, StepperError> {
    let entries = strip_entries(state)?;
    Ok(strip_lines(&entries, state.wizard.orientation())
        .iter()
        .map(line_text)
        .collect::<Vec<_>>()
        .join("\n"))
}

fn selected_mark(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

fn render_step_content_text(state: &AppState) -> Result<String, StepperError> {
    let scope = WizardScope::new(&state.wizard);
    let mut visible = None;
    for step in state.visible_steps() {
        if scope.content(step.number(), false)? == ContentView::Visible {
            visible = Some(step);
        }
    }
    let Some(step) = visible else {
        return Ok("No step selected. Press n or p to move between steps.".to_owned());
    };

    let cursor_for = |index: usize| {
        if state.pane == Pane::Content && index == state.cursor {
            CURSOR_MARK
        } else {
            " "
        }
    };

    let mut lines = vec![format!("{} - {}", step.title(), step.description()), String::new()];
    if state.row_count(step) == 0 {
        lines.push(format!(
            "Nothing to choose yet. Tell the assistant what you need to get {} suggestions.",
            step.title().to_lowercase()
        ));
        return Ok(lines.join("\n"));
    }

    match step {
        ConfigStep::Car => {
            for (index, car) in state.catalog.cars.iter().enumerate() {
                let selected = state.selection.car.as_ref().map(|chosen| &chosen.id) == Some(&car.id);
                let mut line = format!(
                    "{} {} {} | {} | {} seats | {} bags | {} | {} | {} | total {}",
                    cursor_for(index),
                    selected_mark(selected),
                    car.name,
                    car.group_type,
                    car.passengers,
                    car.bags,
                    car.transmission,
                    car.fuel_type,
                    car.daily_price.label(),
                    car.total_price.label()
                );
                if !car.tags.is_empty() {
                    line.push_str(&format!(" ({})", car.tags.join(", ")));
                }
                lines.push(line);
            }
        }
        ConfigStep::Insurance => {
            for (index, protection) in state.catalog.protections.iter().enumerate() {
                let selected = state
                    .selection
                    .protection
                    .as_ref()
                    .map(|chosen| &chosen.id)
                    == Some(&protection.id);
                let mut name = protection.name.clone();
                if protection.rating_stars > 0 {
                    name.push(' ');
                    name.push_str(&"*".repeat(usize::from(protection.rating_stars)));
                }
                let mut line = format!(
                    "{} {} {} | {}",
                    cursor_for(index),
                    selected_mark(selected),
                    name,
                    protection.total_price.label()
                );
                if let Some(deductible) = &protection.deductible {
                    line.push_str(&format!(" | deductible {}", deductible.label()));
                }
                if protection.is_nudge {
                    line.push_str(" (recommended)");
                }
                lines.push(line);
            }
        }
        ConfigStep::AddOns => {
            for (index, (add_on, option)) in state.catalog.add_on_rows().into_iter().enumerate() {
                let selected = state
                    .selection
                    .is_option_selected(add_on.id, &option.charge_id);
                let mut line = format!(
                    "{} {} {}: {} | {}",
                    cursor_for(index),
                    selected_mark(selected),
                    add_on.name,
                    option.title,
                    option.price.label()
                );
                if !option.enabled {
                    line.push_str(" (unavailable)");
                }
                lines.push(line);
            }
        }
    }
    Ok(lines.join("\n"))
}

fn render_chat_text(state: &AppState, view_data: &ViewData) -> String {
    let mut lines = state
        .transcript
        .messages()
        .iter()
        .map(|message| {
            let speaker = match message.role {
                ChatRole::User => "you",
                ChatRole::Assistant => "assistant",
            };
            format!("{speaker}: {}", message.content)
        })
        .collect::<Vec<String>>();
    if state.chat_pending {
        lines.push("assistant is thinking…".to_owned());
    }
    lines.push(String::new());
    let caret = if state.pane == Pane::Chat { "_" } else { "" };
    lines.push(format!("> {}{caret}", view_data.chat_input));
    lines.join("\n")
}

fn render_review_text(state: &AppState) -> String {
    let mut lines = state.review().lines();
    lines.push(String::new());
    lines.push("enter/f finalise | esc close".to_owned());
    lines.join("\n")
}

fn help_overlay_text() -> &'static str {
    "tab/shift+tab     switch pane\n\
     steps pane        arrows move focus, home/end jump, enter opens step\n\
     options pane      j/k move, enter selects or toggles\n\
     chat pane         type and press enter to ask the assistant\n\
     n / p             next or previous step\n\
     r                 review booking\n\
     ctrl+q            quit"
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if state.review_open || view_data.help_visible {
        return String::new();
    }
    let pane = state.pane.label().to_uppercase();
    let hints = match state.pane {
        Pane::Stepper => "arrows focus | enter open | n/p step | r review | tab pane | ? help",
        Pane::Content => "j/k move | enter choose | n/p step | r review | tab pane | ? help",
        Pane::Chat => "type + enter send | esc clear | tab pane | ctrl+q quit",
    };
    match &state.status_line {
        Some(status) => format!("{pane} | {status} | {hints}"),
        None => format!("{pane} | {hints}"),
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let orientation = state.wizard.orientation();
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(frame.area());

    let body = if view_data.options.show_chat {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(outer[0])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(outer[0])
    };

    let (stepper_area, content_area) = match orientation {
        StepperOrientation::Horizontal => {
            let split = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(1)])
                .split(body[0]);
            (split[0], split[1])
        }
        StepperOrientation::Vertical => {
            let split = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(30), Constraint::Min(1)])
                .split(body[0]);
            (split[0], split[1])
        }
    };

    let title = format!("rentwise | {}", view_data.title);
    let stepper = match strip_entries(state) {
        Ok(entries) => Paragraph::new(Text::from(strip_lines(&entries, orientation))),
        Err(error) => Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
    };
    frame.render_widget(
        stepper.block(pane_block(title, state.pane == Pane::Stepper)),
        stepper_area,
    );

    let content_title = state
        .current_step()
        .map_or_else(|| "options".to_owned(), |step| step.title().to_lowercase());
    let content = render_step_content_text(state).unwrap_or_else(|error| error.to_string());
    frame.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(pane_block(content_title, state.pane == Pane::Content)),
        content_area,
    );

    if view_data.options.show_chat {
        let chat_area = body[1];
        let chat_text = render_chat_text(state, view_data);
        let visible_rows = usize::from(chat_area.height.saturating_sub(2)).max(1);
        let total = chat_text.lines().count();
        let tail = chat_text
            .lines()
            .skip(total.saturating_sub(visible_rows))
            .collect::<Vec<_>>()
            .join("\n");
        frame.render_widget(
            Paragraph::new(tail)
                .wrap(Wrap { trim: false })
                .block(pane_block("assistant".to_owned(), state.pane == Pane::Chat)),
            chat_area,
        );
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, outer[1]);

    if state.review_open {
        let area = centered_rect(70, 60, frame.area());
        frame.render_widget(Clear, area);
        let review = Paragraph::new(render_review_text(state))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title("review")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(review, area);
    }

    if view_data.help_visible {
        let area = centered_rect(72, 50, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
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
