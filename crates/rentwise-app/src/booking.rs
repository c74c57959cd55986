// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

use crate::{AddOn, AddOnId, AddOnOption, Car, Catalog, ChargeId, Price, Protection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigStep {
    Car,
    Insurance,
    AddOns,
}

impl ConfigStep {
    pub const ALL: [Self; 3] = [Self::Car, Self::Insurance, Self::AddOns];

    pub const fn number(self) -> i32 {
        match self {
            Self::Car => 1,
            Self::Insurance => 2,
            Self::AddOns => 3,
        }
    }

    pub fn from_number(step: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|candidate| candidate.number() == step)
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Car => "Car",
            Self::Insurance => "Insurance",
            Self::AddOns => "Add-ons",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Car => "pick your upgrade",
            Self::Insurance => "choose a protection package",
            Self::AddOns => "extras for the trip",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedAddOn {
    pub add_on_id: AddOnId,
    pub add_on_name: String,
    pub option: AddOnOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookingSelection {
    pub car: Option<Car>,
    pub protection: Option<Protection>,
    pub add_on_options: Vec<SelectedAddOn>,
}

impl BookingSelection {
    pub fn select_car(&mut self, car: Car) {
        self.car = Some(car);
    }

    pub fn select_protection(&mut self, protection: Protection) {
        self.protection = Some(protection);
    }

    pub fn is_option_selected(&self, add_on: AddOnId, charge: &ChargeId) -> bool {
        self.add_on_options
            .iter()
            .any(|entry| entry.add_on_id == add_on && &entry.option.charge_id == charge)
    }

    /// Returns whether the option is selected after the toggle.
    pub fn toggle_add_on_option(&mut self, add_on: &AddOn, option: &AddOnOption) -> Result<bool> {
        if self.is_option_selected(add_on.id, &option.charge_id) {
            self.add_on_options.retain(|entry| {
                !(entry.add_on_id == add_on.id && entry.option.charge_id == option.charge_id)
            });
            return Ok(false);
        }

        if !option.enabled {
            bail!(
                "{} is not available for this booking; pick another option",
                option.title
            );
        }

        if option.strategy.multi_selection_allowed {
            let limit = option.strategy.max_selection_limit;
            let current = self
                .add_on_options
                .iter()
                .filter(|entry| entry.add_on_id == add_on.id)
                .count();
            if limit > 0 && current >= limit as usize {
                bail!(
                    "{} allows at most {} selections; deselect one first",
                    add_on.name,
                    limit
                );
            }
        } else {
            self.add_on_options
                .retain(|entry| entry.add_on_id != add_on.id);
        }

        self.add_on_options.push(SelectedAddOn {
            add_on_id: add_on.id,
            add_on_name: add_on.name.clone(),
            option: option.clone(),
        });
        Ok(true)
    }

    pub fn has_choice_for(&self, step: ConfigStep) -> bool {
        match step {
            ConfigStep::Car => self.car.is_some(),
            ConfigStep::Insurance => self.protection.is_some(),
            ConfigStep::AddOns => !self.add_on_options.is_empty(),
        }
    }

    /// Drops choices the catalog no longer offers.
    pub fn retain_offered(&mut self, catalog: &Catalog) -> bool {
        let before = self.clone();
        if let Some(car) = &self.car
            && catalog.car(&car.id).is_none()
        {
            self.car = None;
        }
        if let Some(protection) = &self.protection
            && catalog.protection(&protection.id).is_none()
        {
            self.protection = None;
        }
        self.add_on_options.retain(|entry| {
            catalog
                .add_on_option(entry.add_on_id, &entry.option.charge_id)
                .is_some()
        });
        before != *self
    }

    pub fn is_empty(&self) -> bool {
        self.car.is_none() && self.protection.is_none() && self.add_on_options.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReview {
    pub car: String,
    pub protection: String,
    pub add_ons: Vec<String>,
    pub total: Option<Price>,
    pub recurring: Option<Price>,
}

impl BookingReview {
    pub fn from_selection(selection: &BookingSelection) -> Self {
        let car = match &selection.car {
            Some(car) => format!(
                "{} {} ({}) - {} {} {}",
                car.brand,
                car.model,
                car.group_type,
                car.total_price.amount_label(),
                car.total_price.currency,
                car.total_price.suffix
            )
            .trim_end()
            .to_owned(),
            None => "No car selected.".to_owned(),
        };
        let protection = match &selection.protection {
            Some(protection) => protection.name.clone(),
            None => "No insurance selected.".to_owned(),
        };
        let add_ons = if selection.add_on_options.is_empty() {
            vec!["No add-ons selected.".to_owned()]
        } else {
            selection
                .add_on_options
                .iter()
                .map(|entry| {
                    format!(
                        "{} - {} {}{}",
                        entry.option.title,
                        entry.option.price.amount_label(),
                        entry.option.price.currency,
                        entry.option.price.suffix
                    )
                })
                .collect()
        };

        Self {
            car,
            protection,
            add_ons,
            total: selection_total(selection),
            recurring: recurring_total(selection),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        let mut out = vec![
            "Review your booking".to_owned(),
            String::new(),
            "Car".to_owned(),
            format!("  {}", self.car),
            "Insurance".to_owned(),
            format!("  {}", self.protection),
            "Add-ons".to_owned(),
        ];
        out.extend(self.add_ons.iter().map(|line| format!("  {line}")));
        if let Some(total) = &self.total {
            out.push(String::new());
            out.push(format!("Total: {} {}", total.currency, total.amount_label()));
        }
        if let Some(recurring) = &self.recurring {
            out.push(format!(
                "Plus add-ons: {} {}{}",
                recurring.currency,
                recurring.amount_label(),
                recurring.suffix
            ));
        }
        out
    }
}

/// Whole-rental prices: the car, the protection and any add-on priced
/// without a period suffix.
fn selection_total(selection: &BookingSelection) -> Option<Price> {
    let prices = selection
        .car
        .iter()
        .map(|car| &car.total_price)
        .chain(selection.protection.iter().map(|p| &p.total_price))
        .chain(
            selection
                .add_on_options
                .iter()
                .map(|entry| &entry.option.price)
                .filter(|price| price.suffix.is_empty()),
        )
        .collect::<Vec<&Price>>();
    sum_prices(&prices)
}

/// Add-on prices charged per period, such as `/day`.
fn recurring_total(selection: &BookingSelection) -> Option<Price> {
    let prices = selection
        .add_on_options
        .iter()
        .map(|entry| &entry.option.price)
        .filter(|price| !price.suffix.is_empty())
        .collect::<Vec<&Price>>();
    sum_prices(&prices)
}

/// `None` when empty or when currency or suffix disagree.
fn sum_prices(prices: &[&Price]) -> Option<Price> {
    let first = prices.first()?;
    if prices
        .iter()
        .any(|price| price.currency != first.currency || price.suffix != first.suffix)
    {
        return None;
    }
    Some(Price {
        currency: first.currency.clone(),
        amount_cents: prices.iter().map(|price| price.amount_cents).sum(),
        suffix: first.suffix.clone(),
    })
}
