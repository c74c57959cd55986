// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Headless step wizard.
//!
//! The controller tracks one current step among an ordered list of declared
//! steps and derives every step's display status from that single value. It
//! runs either uncontrolled (it owns the value) or controlled (the host owns
//! the value and the controller only forwards change intents).

use std::fmt;

use thiserror::Error;
use tracing::debug;

use crate::TriggerId;
use crate::stepper_view::IndicatorOverrides;
use crate::triggers::{FocusIntent, TriggerRegistry};

pub const DEFAULT_STEP: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepperOrientation {
    #[default]
    Horizontal,
    Vertical,
}

impl StepperOrientation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "horizontal" => Some(Self::Horizontal),
            "vertical" => Some(Self::Vertical),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepStatus {
    Active,
    Completed,
    Inactive,
    Loading,
}

impl StepStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Inactive => "inactive",
            Self::Loading => "loading",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepDescriptor {
    pub step: i32,
    pub completed: bool,
    pub disabled: bool,
    pub loading: bool,
}

impl StepDescriptor {
    pub const fn new(step: i32) -> Self {
        Self {
            step,
            completed: false,
            disabled: false,
            loading: false,
        }
    }

    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub const fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

/// Structural status of `descriptor` while `current_step` is current.
///
/// Never returns [`StepStatus::Loading`]; loading is reported separately by
/// [`is_loading`].
pub const fn derive_status(current_step: i32, descriptor: &StepDescriptor) -> StepStatus {
    if descriptor.completed || descriptor.step < current_step {
        StepStatus::Completed
    } else if descriptor.step == current_step {
        StepStatus::Active
    } else {
        StepStatus::Inactive
    }
}

pub const fn is_loading(current_step: i32, descriptor: &StepDescriptor) -> bool {
    descriptor.loading && descriptor.step == current_step
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepItemState {
    pub step: i32,
    pub status: StepStatus,
    pub is_disabled: bool,
    pub is_loading: bool,
}

impl StepItemState {
    pub const fn derive(current_step: i32, descriptor: &StepDescriptor) -> Self {
        Self {
            step: descriptor.step,
            status: derive_status(current_step, descriptor),
            is_disabled: descriptor.disabled,
            is_loading: is_loading(current_step, descriptor),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StepperError {
    #[error("stepper binding used outside of a stepper")]
    OutsideStepper,
    #[error("step item {step} used outside of a stepper item; declare it in the step list")]
    OutsideItem { step: i32 },
}

pub type ValueChangeHandler = Box<dyn FnMut(i32)>;

pub struct WizardController<T = String> {
    active_step: i32,
    value: Option<i32>,
    on_value_change: Option<ValueChangeHandler>,
    steps: Vec<StepDescriptor>,
    orientation: StepperOrientation,
    indicators: IndicatorOverrides<T>,
    triggers: TriggerRegistry<TriggerId>,
    focused: Option<TriggerId>,
}

impl<T: fmt::Debug> fmt::Debug for WizardController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WizardController")
            .field("active_step", &self.active_step)
            .field("value", &self.value)
            .field("on_value_change", &self.on_value_change.is_some())
            .field("steps", &self.steps)
            .field("orientation", &self.orientation)
            .field("indicators", &self.indicators)
            .field("triggers", &self.triggers)
            .field("focused", &self.focused)
            .finish()
    }
}

impl<T> WizardController<T> {
    pub fn new(steps: Vec<StepDescriptor>) -> Self {
        Self {
            active_step: DEFAULT_STEP,
            value: None,
            on_value_change: None,
            steps,
            orientation: StepperOrientation::default(),
            indicators: IndicatorOverrides::default(),
            triggers: TriggerRegistry::new(),
            focused: None,
        }
    }

    /// Initial step for uncontrolled operation. Accepted verbatim.
    pub fn with_default_value(mut self, step: i32) -> Self {
        self.active_step = step;
        self
    }

    pub fn with_value(mut self, value: Option<i32>) -> Self {
        self.value = value;
        self
    }

    pub fn with_orientation(mut self, orientation: StepperOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_indicators(mut self, indicators: IndicatorOverrides<T>) -> Self {
        self.indicators = indicators;
        self
    }

    pub fn on_value_change(mut self, handler: impl FnMut(i32) + 'static) -> Self {
        self.on_value_change = Some(Box::new(handler));
        self
    }

    pub fn is_controlled(&self) -> bool {
        self.value.is_some()
    }

    pub fn current_step(&self) -> i32 {
        self.value.unwrap_or(self.active_step)
    }

    /// External update of the controlled value. `None` returns the
    /// controller to uncontrolled operation on its last internal value.
    pub fn set_value(&mut self, value: Option<i32>) {
        self.value = value;
    }

    pub fn set_active_step(&mut self, step: i32) {
        if self.value.is_none() {
            debug!(from = self.active_step, to = step, "wizard step changed");
            self.active_step = step;
        } else {
            debug!(step, "wizard step change forwarded to owner");
        }
        if let Some(handler) = self.on_value_change.as_mut() {
            handler(step);
        }
    }

    pub fn steps_count(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn set_steps(&mut self, steps: Vec<StepDescriptor>) {
        self.steps = steps;
    }

    pub fn update_step(&mut self, step: i32, update: impl FnOnce(&mut StepDescriptor)) -> bool {
        match self.steps.iter_mut().find(|descriptor| descriptor.step == step) {
            Some(descriptor) => {
                update(descriptor);
                true
            }
            None => false,
        }
    }

    pub fn orientation(&self) -> StepperOrientation {
        self.orientation
    }

    pub fn indicators(&self) -> &IndicatorOverrides<T> {
        &self.indicators
    }

    pub fn descriptor(&self, step: i32) -> Option<&StepDescriptor> {
        self.steps.iter().find(|descriptor| descriptor.step == step)
    }

    pub fn item(&self, step: i32) -> Result<StepItemState, StepperError> {
        let descriptor = self
            .descriptor(step)
            .ok_or(StepperError::OutsideItem { step })?;
        Ok(StepItemState::derive(self.current_step(), descriptor))
    }

    pub fn items(&self) -> Vec<StepItemState> {
        let current = self.current_step();
        self.steps
            .iter()
            .map(|descriptor| StepItemState::derive(current, descriptor))
            .collect()
    }

    pub fn register_trigger(&mut self, handle: TriggerId) -> bool {
        self.triggers.register(handle)
    }

    pub fn unregister_trigger(&mut self, handle: TriggerId) -> bool {
        let removed = self.triggers.unregister(&handle);
        if removed && self.focused == Some(handle) {
            self.focused = None;
        }
        removed
    }

    pub fn triggers(&self) -> &TriggerRegistry<TriggerId> {
        &self.triggers
    }

    pub fn focused_trigger(&self) -> Option<TriggerId> {
        self.focused
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
            .and_then(|handle| self.triggers.position(&handle))
    }

    /// Moves focus directly to `handle` if it is registered.
    pub fn focus_trigger(&mut self, handle: TriggerId) -> bool {
        if !self.triggers.contains(&handle) {
            return false;
        }
        self.focused = Some(handle);
        true
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    pub fn focus_next(&mut self, current_index: usize) -> Option<TriggerId> {
        self.move_focus(FocusIntent::Next, current_index)
    }

    pub fn focus_previous(&mut self, current_index: usize) -> Option<TriggerId> {
        self.move_focus(FocusIntent::Previous, current_index)
    }

    pub fn focus_first(&mut self) -> Option<TriggerId> {
        self.move_focus(FocusIntent::First, 0)
    }

    pub fn focus_last(&mut self) -> Option<TriggerId> {
        self.move_focus(FocusIntent::Last, 0)
    }

    pub fn move_focus(&mut self, intent: FocusIntent, current_index: usize) -> Option<TriggerId> {
        let target = self.triggers.target(intent, current_index).copied()?;
        debug!(intent = intent.label(), ?target, "trigger focus moved");
        self.focused = Some(target);
        Some(target)
    }
}
