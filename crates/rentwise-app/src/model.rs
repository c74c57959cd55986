// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::ids::*;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Price {
    pub currency: String,
    pub amount_cents: i64,
    pub suffix: String,
}

impl Price {
    pub fn new(currency: &str, amount_cents: i64, suffix: &str) -> Self {
        Self {
            currency: currency.to_owned(),
            amount_cents,
            suffix: suffix.to_owned(),
        }
    }

    pub fn amount_label(&self) -> String {
        format_cents(self.amount_cents)
    }

    pub fn label(&self) -> String {
        let mut out = format!("{} {}", self.currency, self.amount_label());
        if !self.suffix.is_empty() {
            out.push_str(&self.suffix);
        }
        out
    }
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Car {
    pub id: CarId,
    pub name: String,
    pub brand: String,
    pub model: String,
    pub image: Option<String>,
    pub group_type: String,
    pub passengers: u32,
    pub bags: u32,
    pub transmission: String,
    pub fuel_type: String,
    pub daily_price: Price,
    pub total_price: Price,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageItem {
    pub id: CoverageId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Protection {
    pub id: ProtectionId,
    pub name: String,
    pub deductible: Option<Price>,
    pub rating_stars: u8,
    pub includes: Vec<CoverageItem>,
    pub excludes: Vec<CoverageItem>,
    pub total_price: Price,
    pub is_nudge: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStrategy {
    pub multi_selection_allowed: bool,
    pub max_selection_limit: u32,
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self {
            multi_selection_allowed: false,
            max_selection_limit: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOnOption {
    pub charge_id: ChargeId,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub price: Price,
    pub enabled: bool,
    pub strategy: SelectionStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: String,
    pub options: Vec<AddOnOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    pub cars: Vec<Car>,
    pub protections: Vec<Protection>,
    pub add_ons: Vec<AddOn>,
}

impl Catalog {
    pub fn is_empty(&self) -> bool {
        self.cars.is_empty() && self.protections.is_empty() && self.add_ons.is_empty()
    }

    pub fn car(&self, id: &CarId) -> Option<&Car> {
        self.cars.iter().find(|car| &car.id == id)
    }

    pub fn protection(&self, id: &ProtectionId) -> Option<&Protection> {
        self.protections
            .iter()
            .find(|protection| &protection.id == id)
    }

    pub fn add_on_option(&self, add_on: AddOnId, charge: &ChargeId) -> Option<&AddOnOption> {
        self.add_ons
            .iter()
            .find(|entry| entry.id == add_on)
            .and_then(|entry| entry.options.iter().find(|option| &option.charge_id == charge))
    }

    /// Add-on options flattened in display order.
    pub fn add_on_rows(&self) -> Vec<(&AddOn, &AddOnOption)> {
        self.add_ons
            .iter()
            .flat_map(|add_on| add_on.options.iter().map(move |option| (add_on, option)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub content: String,
    pub created_at: Option<OffsetDateTime>,
}
