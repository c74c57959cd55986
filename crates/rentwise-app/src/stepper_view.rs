// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Read-only bindings that presentation code renders from.
//!
//! Every binding is reached through a [`WizardScope`], which stands in for
//! the wizard instance a view is nested in. A detached scope fails fast.

use crate::TriggerId;
use crate::stepper::{
    StepItemState, StepStatus, StepperError, StepperOrientation, WizardController,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorOverrides<T> {
    pub active: Option<T>,
    pub completed: Option<T>,
    pub inactive: Option<T>,
    pub loading: Option<T>,
}

impl<T> Default for IndicatorOverrides<T> {
    fn default() -> Self {
        Self {
            active: None,
            completed: None,
            inactive: None,
            loading: None,
        }
    }
}

impl<T> IndicatorOverrides<T> {
    pub fn with(mut self, status: StepStatus, content: T) -> Self {
        *self.slot_mut(status) = Some(content);
        self
    }

    pub fn get(&self, status: StepStatus) -> Option<&T> {
        match status {
            StepStatus::Active => self.active.as_ref(),
            StepStatus::Completed => self.completed.as_ref(),
            StepStatus::Inactive => self.inactive.as_ref(),
            StepStatus::Loading => self.loading.as_ref(),
        }
    }

    fn slot_mut(&mut self, status: StepStatus) -> &mut Option<T> {
        match status {
            StepStatus::Active => &mut self.active,
            StepStatus::Completed => &mut self.completed,
            StepStatus::Inactive => &mut self.inactive,
            StepStatus::Loading => &mut self.loading,
        }
    }

    /// Loading override first (only while loading), then the structural
    /// status override. `None` means the ordinal number is shown.
    pub fn resolve(&self, status: StepStatus, loading: bool) -> Option<&T> {
        match (loading, self.loading.as_ref()) {
            (true, Some(content)) => Some(content),
            _ => self.get(status),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorContent<'a, T> {
    Override(&'a T),
    Ordinal(i32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorView<'a, T> {
    pub status: StepStatus,
    pub loading: bool,
    pub content: IndicatorContent<'a, T>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerView {
    pub handle: TriggerId,
    pub step: i32,
    pub status: StepStatus,
    pub loading: bool,
    pub disabled: bool,
    pub focused: bool,
    pub tab_stop: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparatorView {
    pub status: StepStatus,
    pub orientation: StepperOrientation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelView<'a> {
    pub status: StepStatus,
    pub text: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavView {
    pub current_step: i32,
    pub orientation: StepperOrientation,
    pub steps_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentView {
    Visible,
    Hidden,
    Unmounted,
}

#[derive(Debug)]
pub struct WizardScope<'a, T> {
    wizard: Option<&'a WizardController<T>>,
}

impl<T> Clone for WizardScope<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for WizardScope<'_, T> {}

impl<'a, T> WizardScope<'a, T> {
    pub const fn new(wizard: &'a WizardController<T>) -> Self {
        Self {
            wizard: Some(wizard),
        }
    }

    pub const fn detached() -> Self {
        Self { wizard: None }
    }

    pub fn stepper(&self) -> Result<&'a WizardController<T>, StepperError> {
        self.wizard.ok_or(StepperError::OutsideStepper)
    }

    pub fn item(&self, step: i32) -> Result<StepItemState, StepperError> {
        self.stepper()?.item(step)
    }

    pub fn nav(&self) -> Result<NavView, StepperError> {
        let wizard = self.stepper()?;
        Ok(NavView {
            current_step: wizard.current_step(),
            orientation: wizard.orientation(),
            steps_count: wizard.steps_count(),
        })
    }

    /// The focused trigger is the tab stop; with nothing focused the trigger
    /// of the current step takes that role.
    pub fn trigger(&self, step: i32, handle: TriggerId) -> Result<TriggerView, StepperError> {
        let wizard = self.stepper()?;
        let item = wizard.item(step)?;
        let focused = wizard.focused_trigger() == Some(handle);
        let tab_stop = match wizard.focused_trigger() {
            Some(_) => focused,
            None => item.step == wizard.current_step(),
        };
        Ok(TriggerView {
            handle,
            step,
            status: item.status,
            loading: item.is_loading,
            disabled: item.is_disabled,
            focused,
            tab_stop,
        })
    }

    pub fn indicator(&self, step: i32) -> Result<IndicatorView<'a, T>, StepperError> {
        let wizard = self.stepper()?;
        let item = wizard.item(step)?;
        let content = match wizard.indicators().resolve(item.status, item.is_loading) {
            Some(content) => IndicatorContent::Override(content),
            None => IndicatorContent::Ordinal(step),
        };
        Ok(IndicatorView {
            status: item.status,
            loading: item.is_loading,
            content,
        })
    }

    pub fn separator(&self, step: i32) -> Result<SeparatorView, StepperError> {
        let wizard = self.stepper()?;
        Ok(SeparatorView {
            status: wizard.item(step)?.status,
            orientation: wizard.orientation(),
        })
    }

    pub fn title<'t>(&self, step: i32, text: &'t str) -> Result<LabelView<'t>, StepperError> {
        Ok(LabelView {
            status: self.item(step)?.status,
            text,
        })
    }

    pub fn description<'t>(
        &self,
        step: i32,
        text: &'t str,
    ) -> Result<LabelView<'t>, StepperError> {
        self.title(step, text)
    }

    pub fn content(&self, value: i32, force_mount: bool) -> Result<ContentView, StepperError> {
        let active = self.stepper()?.current_step() == value;
        Ok(match (active, force_mount) {
            (true, _) => ContentView::Visible,
            (false, true) => ContentView::Hidden,
            (false, false) => ContentView::Unmounted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ContentView, IndicatorContent, IndicatorOverrides, WizardScope};
    use crate::TriggerId;
    use crate::stepper::{StepDescriptor, StepStatus, StepperError, WizardController};

    fn wizard(overrides: IndicatorOverrides<&'static str>) -> WizardController<&'static str> {
        WizardController::new(vec![
            StepDescriptor::new(1),
            StepDescriptor::new(2).loading(true),
            StepDescriptor::new(3),
        ])
        .with_default_value(2)
        .with_indicators(overrides)
    }

    #[test]
    fn resolve_prefers_loading_then_status() {
        let overrides = IndicatorOverrides::default()
            .with(StepStatus::Active, "a")
            .with(StepStatus::Loading, "l");
        assert_eq!(overrides.resolve(StepStatus::Active, true), Some(&"l"));
        assert_eq!(overrides.resolve(StepStatus::Active, false), Some(&"a"));
        assert_eq!(overrides.resolve(StepStatus::Completed, true), Some(&"l"));
        assert_eq!(overrides.resolve(StepStatus::Inactive, false), None);
    }

    #[test]
    fn loading_flag_without_loading_override_uses_status_override() {
        let overrides = IndicatorOverrides::default().with(StepStatus::Active, "a");
        assert_eq!(overrides.resolve(StepStatus::Active, true), Some(&"a"));
    }

    #[test]
    fn empty_override_value_is_still_used() {
        let overrides = IndicatorOverrides::default().with(StepStatus::Completed, "");
        assert_eq!(overrides.resolve(StepStatus::Completed, false), Some(&""));
    }

    #[test]
    fn indicator_falls_back_to_ordinal() -> Result<(), StepperError> {
        let wizard = wizard(IndicatorOverrides::default().with(StepStatus::Loading, "~"));
        let scope = WizardScope::new(&wizard);

        let loading = scope.indicator(2)?;
        assert!(loading.loading);
        assert_eq!(loading.content, IndicatorContent::Override(&"~"));

        let inactive = scope.indicator(3)?;
        assert_eq!(inactive.status, StepStatus::Inactive);
        assert_eq!(inactive.content, IndicatorContent::Ordinal(3));
        Ok(())
    }

    #[test]
    fn detached_scope_fails_fast() {
        let scope: WizardScope<'_, &str> = WizardScope::detached();
        assert_eq!(scope.indicator(1), Err(StepperError::OutsideStepper));
        assert_eq!(scope.nav(), Err(StepperError::OutsideStepper));
        assert_eq!(
            scope.trigger(1, TriggerId::new(1)).map(|view| view.step),
            Err(StepperError::OutsideStepper)
        );
        assert_eq!(scope.content(1, true), Err(StepperError::OutsideStepper));
    }

    #[test]
    fn undeclared_item_is_a_scope_violation() {
        let wizard = wizard(IndicatorOverrides::default());
        let scope = WizardScope::new(&wizard);
        assert_eq!(
            scope.title(7, "extras").map(|view| view.text),
            Err(StepperError::OutsideItem { step: 7 })
        );
    }

    #[test]
    fn tab_stop_follows_focus_then_current_step() -> Result<(), StepperError> {
        let mut wizard = wizard(IndicatorOverrides::default());
        let handles = [TriggerId::new(1), TriggerId::new(2), TriggerId::new(3)];
        for handle in handles {
            wizard.register_trigger(handle);
        }

        {
            let scope = WizardScope::new(&wizard);
            assert!(scope.trigger(2, handles[1])?.tab_stop);
            assert!(!scope.trigger(1, handles[0])?.tab_stop);
        }

        wizard.focus_first();
        let scope = WizardScope::new(&wizard);
        let first = scope.trigger(1, handles[0])?;
        assert!(first.focused && first.tab_stop);
        assert!(!scope.trigger(2, handles[1])?.tab_stop);
        Ok(())
    }

    #[test]
    fn content_visibility_honors_force_mount() -> Result<(), StepperError> {
        let wizard = wizard(IndicatorOverrides::default());
        let scope = WizardScope::new(&wizard);
        assert_eq!(scope.content(2, false)?, ContentView::Visible);
        assert_eq!(scope.content(1, true)?, ContentView::Hidden);
        assert_eq!(scope.content(3, false)?, ContentView::Unmounted);
        Ok(())
    }

    #[test]
    fn nav_and_separator_expose_orientation() -> Result<(), StepperError> {
        let wizard = wizard(IndicatorOverrides::default());
        let scope = WizardScope::new(&wizard);
        let nav = scope.nav()?;
        assert_eq!(nav.current_step, 2);
        assert_eq!(nav.steps_count, 3);
        assert_eq!(scope.separator(1)?.status, StepStatus::Completed);
        assert_eq!(scope.separator(1)?.orientation, nav.orientation);
        Ok(())
    }
}
