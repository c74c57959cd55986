// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, info, warn};

use crate::{
    BookingReview, BookingSelection, Catalog, ChatRole, ChatTranscript, ConfigStep, FocusIntent,
    IndicatorOverrides, StepDescriptor, StepStatus, StepperOrientation, TriggerId,
    WizardController,
};

pub const COMPLETED_GLYPH: &str = "✓";
pub const LOADING_GLYPH: &str = "…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Stepper,
    Content,
    Chat,
}

impl Pane {
    pub const ALL: [Self; 3] = [Self::Stepper, Self::Content, Self::Chat];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Stepper => "steps",
            Self::Content => "options",
            Self::Chat => "chat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChatUpdate {
    pub assistant: Option<String>,
    pub catalog: Catalog,
}

#[derive(Debug)]
pub struct AppState {
    pub wizard: WizardController<String>,
    pub catalog: Catalog,
    pub selection: BookingSelection,
    pub transcript: ChatTranscript,
    pub pane: Pane,
    pub cursor: usize,
    pub review_open: bool,
    pub finalized: bool,
    pub chat_pending: bool,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StepperOrientation::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextStep,
    PrevStep,
    GoToStep(i32),
    MoveFocus(FocusIntent),
    ActivateFocused,
    CursorDown,
    CursorUp,
    ChooseAtCursor,
    NextPane,
    PrevPane,
    OpenReview,
    CloseReview,
    Finalize,
    ChatSubmitted(String),
    ChatReplied(ChatUpdate),
    ChatFailed(String),
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    StepChanged(i32),
    FocusMoved(TriggerId),
    SelectionChanged(ConfigStep),
    CursorMoved(usize),
    PaneChanged(Pane),
    ReviewVisibilityChanged(bool),
    BookingFinalized,
    ChatPendingChanged(bool),
    CatalogReplaced,
    StatusUpdated(String),
    StatusCleared,
}

pub fn trigger_handle(step: i32) -> TriggerId {
    TriggerId::new(i64::from(step))
}

pub fn step_for_handle(handle: TriggerId) -> Option<i32> {
    i32::try_from(handle.get()).ok()
}

impl AppState {
    pub fn new(orientation: StepperOrientation) -> Self {
        let indicators = IndicatorOverrides::default()
            .with(StepStatus::Completed, COMPLETED_GLYPH.to_owned())
            .with(StepStatus::Loading, LOADING_GLYPH.to_owned());
        let mut state = Self {
            wizard: WizardController::new(Vec::new())
                .with_orientation(orientation)
                .with_indicators(indicators),
            catalog: Catalog::default(),
            selection: BookingSelection::default(),
            transcript: ChatTranscript::default(),
            pane: Pane::Chat,
            cursor: 0,
            review_open: false,
            finalized: false,
            chat_pending: false,
            status_line: None,
        };
        state.sync_steps();
        state
    }

    pub fn current_step(&self) -> Option<ConfigStep> {
        ConfigStep::from_number(self.wizard.current_step())
    }

    /// Steps offered right now. Add-ons only appear once the catalog has any.
    pub fn visible_steps(&self) -> Vec<ConfigStep> {
        ConfigStep::ALL
            .into_iter()
            .filter(|step| *step != ConfigStep::AddOns || !self.catalog.add_ons.is_empty())
            .collect()
    }

    pub fn review(&self) -> BookingReview {
        BookingReview::from_selection(&self.selection)
    }

    pub fn row_count(&self, step: ConfigStep) -> usize {
        match step {
            ConfigStep::Car => self.catalog.cars.len(),
            ConfigStep::Insurance => self.catalog.protections.len(),
            ConfigStep::AddOns => self.catalog.add_on_rows().len(),
        }
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        let events = match command {
            AppCommand::NextStep => self.shift_step(1),
            AppCommand::PrevStep => self.shift_step(-1),
            AppCommand::GoToStep(step) => self.change_step(step),
            AppCommand::MoveFocus(intent) => self.move_focus(intent),
            AppCommand::ActivateFocused => self.activate_focused(),
            AppCommand::CursorDown => self.move_cursor(1),
            AppCommand::CursorUp => self.move_cursor(-1),
            AppCommand::ChooseAtCursor => self.choose_at_cursor(),
            AppCommand::NextPane => self.rotate_pane(1),
            AppCommand::PrevPane => self.rotate_pane(-1),
            AppCommand::OpenReview => {
                self.review_open = true;
                vec![AppEvent::ReviewVisibilityChanged(true)]
            }
            AppCommand::CloseReview => {
                self.review_open = false;
                vec![AppEvent::ReviewVisibilityChanged(false)]
            }
            AppCommand::Finalize => self.finalize(),
            AppCommand::ChatSubmitted(text) => self.submit_chat(&text),
            AppCommand::ChatReplied(update) => self.apply_chat_update(update),
            AppCommand::ChatFailed(error) => {
                warn!(%error, "chat request failed");
                self.chat_pending = false;
                self.transcript.push_apology();
                vec![
                    AppEvent::ChatPendingChanged(false),
                    self.set_status(&format!("chat failed: {error}")),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        };
        self.sync_steps();
        events
    }

    /// Registers a trigger for every declared step and drops triggers whose
    /// step is gone. Views call this when they mount the step strip.
    pub fn sync_triggers(&mut self) {
        let declared = self
            .wizard
            .steps()
            .iter()
            .map(|descriptor| trigger_handle(descriptor.step))
            .collect::<Vec<TriggerId>>();
        let stale = self
            .wizard
            .triggers()
            .handles()
            .iter()
            .copied()
            .filter(|handle| !declared.contains(handle))
            .collect::<Vec<TriggerId>>();
        for handle in stale {
            self.wizard.unregister_trigger(handle);
        }
        for handle in declared {
            self.wizard.register_trigger(handle);
        }
    }

    fn sync_steps(&mut self) {
        let current = self.wizard.current_step();
        let descriptors = self
            .visible_steps()
            .into_iter()
            .map(|step| {
                StepDescriptor::new(step.number())
                    .completed(step.number() != current && self.selection.has_choice_for(step))
                    .disabled(self.row_count(step) == 0)
                    .loading(self.chat_pending)
            })
            .collect();
        self.wizard.set_steps(descriptors);
    }

    fn shift_step(&mut self, delta: i32) -> Vec<AppEvent> {
        let count = i32::try_from(self.wizard.steps_count()).unwrap_or(i32::MAX);
        if count == 0 {
            return Vec::new();
        }
        let current = self.wizard.current_step();
        let target = current.saturating_add(delta).clamp(1, count);
        let moves_along = if delta > 0 {
            target > current
        } else {
            target < current
        };
        if !moves_along {
            let message = if delta > 0 {
                "already at the last step"
            } else {
                "already at the first step"
            };
            return vec![self.set_status(message)];
        }
        self.change_step(target)
    }

    fn change_step(&mut self, step: i32) -> Vec<AppEvent> {
        self.wizard.set_active_step(step);
        self.cursor = 0;
        vec![AppEvent::StepChanged(self.wizard.current_step())]
    }

    fn move_focus(&mut self, intent: FocusIntent) -> Vec<AppEvent> {
        let current_index = self
            .wizard
            .focused_index()
            .or_else(|| {
                self.wizard
                    .triggers()
                    .position(&trigger_handle(self.wizard.current_step()))
            })
            .unwrap_or(0);
        match self.wizard.move_focus(intent, current_index) {
            Some(handle) => vec![AppEvent::FocusMoved(handle)],
            None => Vec::new(),
        }
    }

    fn activate_focused(&mut self) -> Vec<AppEvent> {
        let Some(step) = self.wizard.focused_trigger().and_then(step_for_handle) else {
            return vec![self.set_status("no step focused")];
        };
        let disabled = self
            .wizard
            .descriptor(step)
            .is_some_and(|descriptor| descriptor.disabled);
        if disabled {
            let title = ConfigStep::from_number(step).map_or("step", ConfigStep::title);
            return vec![self.set_status(&format!("{title} has nothing to choose yet"))];
        }
        self.change_step(step)
    }

    fn move_cursor(&mut self, delta: isize) -> Vec<AppEvent> {
        let Some(step) = self.current_step() else {
            return Vec::new();
        };
        let rows = self.row_count(step);
        if rows == 0 {
            return Vec::new();
        }
        let next = self.cursor.saturating_add_signed(delta).min(rows - 1);
        if next == self.cursor {
            return Vec::new();
        }
        self.cursor = next;
        vec![AppEvent::CursorMoved(next)]
    }

    fn choose_at_cursor(&mut self) -> Vec<AppEvent> {
        let Some(step) = self.current_step() else {
            return vec![self.set_status("nothing to choose here")];
        };
        let label = match step {
            ConfigStep::Car => match self.catalog.cars.get(self.cursor).cloned() {
                Some(car) => {
                    let label = format!("selected {}", car.name);
                    self.selection.select_car(car);
                    label
                }
                None => return vec![self.set_status("nothing to choose here")],
            },
            ConfigStep::Insurance => match self.catalog.protections.get(self.cursor).cloned() {
                Some(protection) => {
                    let label = format!("selected {}", protection.name);
                    self.selection.select_protection(protection);
                    label
                }
                None => return vec![self.set_status("nothing to choose here")],
            },
            ConfigStep::AddOns => {
                let row = self
                    .catalog
                    .add_on_rows()
                    .get(self.cursor)
                    .map(|(add_on, option)| ((*add_on).clone(), (*option).clone()));
                let Some((add_on, option)) = row else {
                    return vec![self.set_status("nothing to choose here")];
                };
                match self.selection.toggle_add_on_option(&add_on, &option) {
                    Ok(true) => format!("added {}", option.title),
                    Ok(false) => format!("removed {}", option.title),
                    Err(error) => return vec![self.set_status(&error.to_string())],
                }
            }
        };
        debug!(step = step.title(), %label, "selection changed");
        vec![AppEvent::SelectionChanged(step), self.set_status(&label)]
    }

    fn rotate_pane(&mut self, delta: isize) -> Vec<AppEvent> {
        let panes = Pane::ALL;
        let current = panes
            .iter()
            .position(|pane| *pane == self.pane)
            .unwrap_or(0) as isize;
        let len = panes.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.pane = panes[next];

        let mut events = vec![AppEvent::PaneChanged(self.pane)];
        if self.pane == Pane::Stepper {
            let handle = trigger_handle(self.wizard.current_step());
            if self.wizard.focused_trigger().is_none() && self.wizard.focus_trigger(handle) {
                events.push(AppEvent::FocusMoved(handle));
            }
        } else {
            self.wizard.blur();
        }
        events
    }

    fn finalize(&mut self) -> Vec<AppEvent> {
        if self.selection.car.is_none() {
            return vec![self.set_status("choose a car before finalising")];
        }
        let review = self.review();
        info!(car = %review.car, protection = %review.protection, "booking finalised");
        self.finalized = true;
        self.review_open = false;
        vec![
            AppEvent::ReviewVisibilityChanged(false),
            AppEvent::BookingFinalized,
            self.set_status("booking finalised"),
        ]
    }

    fn submit_chat(&mut self, text: &str) -> Vec<AppEvent> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        if self.chat_pending {
            return vec![self.set_status("still waiting for the assistant")];
        }
        self.transcript.push_user(text);
        self.chat_pending = true;
        vec![AppEvent::ChatPendingChanged(true)]
    }

    fn apply_chat_update(&mut self, update: ChatUpdate) -> Vec<AppEvent> {
        self.chat_pending = false;
        if let Some(answer) = update.assistant {
            self.transcript.push(ChatRole::Assistant, &answer, None);
        }
        self.catalog = update.catalog;
        let mut events = vec![AppEvent::ChatPendingChanged(false), AppEvent::CatalogReplaced];
        if self.selection.retain_offered(&self.catalog) {
            events.push(self.set_status("some choices are no longer offered"));
        }
        let visible = self.visible_steps();
        let hidden = self
            .current_step()
            .is_some_and(|step| !visible.contains(&step));
        if hidden && let Some(last) = visible.last() {
            debug!(to = last.number(), "current step withdrawn");
            events.extend(self.change_step(last.number()));
        }
        if let Some(step) = self.current_step() {
            let rows = self.row_count(step);
            self.cursor = self.cursor.min(rows.saturating_sub(1));
        }
        debug!(
            cars = self.catalog.cars.len(),
            protections = self.catalog.protections.len(),
            add_ons = self.catalog.add_ons.len(),
            "catalog replaced"
        );
        events
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState, ChatUpdate, Pane, trigger_handle};
    use crate::{
        AddOn, AddOnId, AddOnOption, Car, CarId, Catalog, ChargeId, ConfigStep, FocusIntent,
        Price, Protection, ProtectionId, SelectionStrategy, StepStatus,
    };

    fn car(id: &str, name: &str) -> Car {
        Car {
            id: CarId::new(id),
            name: name.to_owned(),
            brand: "VW".to_owned(),
            model: name.to_owned(),
            image: None,
            group_type: "Compact".to_owned(),
            passengers: 5,
            bags: 2,
            transmission: "Manual".to_owned(),
            fuel_type: "Petrol".to_owned(),
            daily_price: Price::new("EUR", 3_000, "/day"),
            total_price: Price::new("EUR", 9_000, ""),
            tags: Vec::new(),
        }
    }

    fn protection(id: &str) -> Protection {
        Protection {
            id: ProtectionId::new(id),
            name: format!("Protection {id}"),
            deductible: None,
            rating_stars: 3,
            includes: Vec::new(),
            excludes: Vec::new(),
            total_price: Price::new("EUR", 1_500, ""),
            is_nudge: false,
        }
    }

    fn add_on() -> AddOn {
        AddOn {
            id: AddOnId::new(7),
            name: "Child seat".to_owned(),
            options: vec![AddOnOption {
                charge_id: ChargeId::new("seat"),
                title: "Booster seat".to_owned(),
                description: String::new(),
                tags: Vec::new(),
                price: Price::new("EUR", 800, "/day"),
                enabled: true,
                strategy: SelectionStrategy::default(),
            }],
        }
    }

    fn catalog(with_add_ons: bool) -> Catalog {
        Catalog {
            cars: vec![car("c1", "Golf"), car("c2", "Passat")],
            protections: vec![protection("p1")],
            add_ons: if with_add_ons { vec![add_on()] } else { Vec::new() },
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        state.dispatch(AppCommand::ChatReplied(ChatUpdate {
            assistant: Some("Here you go".to_owned()),
            catalog: catalog(true),
        }));
        state.sync_triggers();
        state
    }

    #[test]
    fn add_ons_step_appears_with_catalog() {
        let mut state = AppState::default();
        assert_eq!(state.wizard.steps_count(), 2);
        state.sync_triggers();
        assert_eq!(state.wizard.triggers().len(), 2);

        state.dispatch(AppCommand::ChatReplied(ChatUpdate {
            assistant: None,
            catalog: catalog(true),
        }));
        state.sync_triggers();
        assert_eq!(state.wizard.steps_count(), 3);
        assert_eq!(state.wizard.triggers().len(), 3);

        state.dispatch(AppCommand::ChatReplied(ChatUpdate {
            assistant: None,
            catalog: catalog(false),
        }));
        state.sync_triggers();
        assert_eq!(state.wizard.steps_count(), 2);
        assert!(!state.wizard.triggers().contains(&trigger_handle(3)));
    }

    #[test]
    fn next_and_prev_clamp_without_wrapping() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::PrevStep);
        assert_eq!(state.wizard.current_step(), 1);
        assert_eq!(
            state.status_line.as_deref(),
            Some("already at the first step")
        );

        for _ in 0..5 {
            state.dispatch(AppCommand::NextStep);
        }
        assert_eq!(state.wizard.current_step(), 3);
    }

    #[test]
    fn withdrawn_add_ons_step_moves_back_to_last_visible_step() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::GoToStep(3));

        let events = state.dispatch(AppCommand::ChatReplied(ChatUpdate {
            assistant: None,
            catalog: catalog(false),
        }));
        assert!(events.contains(&AppEvent::StepChanged(2)));
        assert_eq!(state.wizard.current_step(), 2);
        assert_eq!(state.current_step(), Some(ConfigStep::Insurance));
        assert_eq!(
            state.wizard.item(2).map(|item| item.status),
            Ok(StepStatus::Active)
        );

        let events = state.dispatch(AppCommand::NextStep);
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("already at the last step".to_owned())]
        );
        assert_eq!(state.wizard.current_step(), 2);
    }

    #[test]
    fn next_step_never_moves_backward_from_past_the_end() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::GoToStep(7));

        let events = state.dispatch(AppCommand::NextStep);
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated("already at the last step".to_owned())]
        );
        assert_eq!(state.wizard.current_step(), 7);
    }

    #[test]
    fn go_to_step_accepts_out_of_range_values() {
        let mut state = loaded_state();
        let events = state.dispatch(AppCommand::GoToStep(99));
        assert_eq!(events, vec![AppEvent::StepChanged(99)]);
        assert!(
            state
                .wizard
                .items()
                .iter()
                .all(|item| item.status != StepStatus::Active)
        );

        state.dispatch(AppCommand::PrevStep);
        assert_eq!(state.wizard.current_step(), 3);
    }

    #[test]
    fn arrow_focus_wraps_and_enter_activates() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::NextPane);
        assert_eq!(state.pane, Pane::Stepper);
        assert_eq!(state.wizard.focused_trigger(), Some(trigger_handle(1)));

        let events = state.dispatch(AppCommand::MoveFocus(FocusIntent::Previous));
        assert_eq!(events, vec![AppEvent::FocusMoved(trigger_handle(3))]);

        state.dispatch(AppCommand::MoveFocus(FocusIntent::Next));
        assert_eq!(state.wizard.focused_trigger(), Some(trigger_handle(1)));

        state.dispatch(AppCommand::MoveFocus(FocusIntent::Last));
        let events = state.dispatch(AppCommand::ActivateFocused);
        assert_eq!(events, vec![AppEvent::StepChanged(3)]);
    }

    #[test]
    fn disabled_step_refuses_activation() {
        let mut state = AppState::default();
        state.sync_triggers();
        state.dispatch(AppCommand::NextPane);
        state.dispatch(AppCommand::MoveFocus(FocusIntent::Next));

        let events = state.dispatch(AppCommand::ActivateFocused);
        assert_eq!(state.wizard.current_step(), 1);
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated(
                "Insurance has nothing to choose yet".to_owned()
            )]
        );
    }

    #[test]
    fn choosing_a_car_marks_step_completed_once_left() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::CursorDown);
        let events = state.dispatch(AppCommand::ChooseAtCursor);
        assert_eq!(
            events,
            vec![
                AppEvent::SelectionChanged(ConfigStep::Car),
                AppEvent::StatusUpdated("selected Passat".to_owned()),
            ]
        );
        assert_eq!(
            state.wizard.item(1).map(|item| item.status),
            Ok(StepStatus::Active)
        );

        state.dispatch(AppCommand::NextStep);
        state.dispatch(AppCommand::ChooseAtCursor);
        state.dispatch(AppCommand::NextStep);
        state.dispatch(AppCommand::ChooseAtCursor);
        state.dispatch(AppCommand::GoToStep(1));

        assert_eq!(
            state.wizard.item(3).map(|item| item.status),
            Ok(StepStatus::Completed)
        );
        assert_eq!(state.selection.add_on_options.len(), 1);
    }

    #[test]
    fn pending_chat_marks_current_step_loading() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::ChatSubmitted("something bigger".to_owned()));
        assert!(state.chat_pending);
        assert_eq!(state.wizard.item(1).map(|item| item.is_loading), Ok(true));
        assert_eq!(state.wizard.item(2).map(|item| item.is_loading), Ok(false));

        let events = state.dispatch(AppCommand::ChatSubmitted("again".to_owned()));
        assert_eq!(
            events,
            vec![AppEvent::StatusUpdated(
                "still waiting for the assistant".to_owned()
            )]
        );

        state.dispatch(AppCommand::ChatFailed("timeout".to_owned()));
        assert!(!state.chat_pending);
        assert_eq!(state.wizard.item(1).map(|item| item.is_loading), Ok(false));
        assert_eq!(
            state.transcript.messages().last().map(|m| m.content.as_str()),
            Some(crate::transcript::APOLOGY)
        );
    }

    #[test]
    fn blank_chat_input_is_ignored() {
        let mut state = AppState::default();
        assert!(state.dispatch(AppCommand::ChatSubmitted("   ".to_owned())).is_empty());
        assert_eq!(state.transcript.len(), 1);
    }

    #[test]
    fn catalog_update_drops_stale_selection() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::ChooseAtCursor);
        assert!(state.selection.car.is_some());

        let events = state.dispatch(AppCommand::ChatReplied(ChatUpdate {
            assistant: None,
            catalog: Catalog {
                cars: vec![car("c9", "Polo")],
                ..Catalog::default()
            },
        }));
        assert!(state.selection.car.is_none());
        assert!(events.contains(&AppEvent::StatusUpdated(
            "some choices are no longer offered".to_owned()
        )));
    }

    #[test]
    fn finalize_requires_a_car() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::OpenReview);
        state.dispatch(AppCommand::Finalize);
        assert!(!state.finalized);
        assert!(state.review_open);

        state.dispatch(AppCommand::ChooseAtCursor);
        let events = state.dispatch(AppCommand::Finalize);
        assert!(state.finalized);
        assert!(!state.review_open);
        assert!(events.contains(&AppEvent::BookingFinalized));
    }

    #[test]
    fn leaving_stepper_pane_blurs_focus() {
        let mut state = loaded_state();
        state.dispatch(AppCommand::NextPane);
        assert!(state.wizard.focused_trigger().is_some());
        state.dispatch(AppCommand::NextPane);
        assert_eq!(state.pane, Pane::Content);
        assert_eq!(state.wizard.focused_trigger(), None);
    }
}
