// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rentwise_app::{
    AddOn, AddOnId, AddOnOption, Car, CarId, Catalog, ChargeId, CoverageId, CoverageItem, Price,
    Protection, ProtectionId, SelectionStrategy,
};
use std::path::PathBuf;

const CURRENCY: &str = "EUR";

const VEHICLES: [(&str, &str, &str); 14] = [
    ("VW", "Golf", "Compact"),
    ("VW", "Passat", "Estate"),
    ("BMW", "1 Series", "Compact"),
    ("BMW", "X1", "SUV"),
    ("BMW", "5 Series", "Sedan"),
    ("Audi", "A3", "Compact"),
    ("Audi", "Q5", "SUV"),
    ("Mercedes-Benz", "C-Class", "Sedan"),
    ("Mercedes-Benz", "V-Class", "Van"),
    ("Skoda", "Octavia", "Estate"),
    ("Seat", "Ibiza", "Economy"),
    ("Peugeot", "208", "Economy"),
    ("Cupra", "Formentor", "SUV"),
    ("Tesla", "Model 3", "Sedan"),
];

const TRANSMISSIONS: [&str; 2] = ["Automatic", "Manual"];
const FUEL_TYPES: [&str; 4] = ["Petrol", "Diesel", "Hybrid", "Electric"];
const CAR_TAGS: [&str; 4] = ["Recommended", "New", "Luxury", "10% off"];

const PROTECTIONS: [(&str, u8); 4] = [
    ("I don't need protection", 0),
    ("Basic protection", 2),
    ("Smart protection", 4),
    ("Peace of mind", 5),
];

const COVERAGE: [(&str, &str); 6] = [
    ("CDW", "Collision damage"),
    ("TP", "Theft protection"),
    ("GLASS", "Glass and tyres"),
    ("LI", "Liability"),
    ("RSA", "Roadside assistance"),
    ("PAI", "Personal accident"),
];

const ADD_ON_GROUPS: [(&str, bool, u32, &[(&str, &str, i64)]); 3] = [
    (
        "Child seats",
        true,
        2,
        &[
            ("BS", "Baby seat", 1_200),
            ("CS", "Child seat", 1_100),
            ("BO", "Booster seat", 800),
        ],
    ),
    ("Additional driver", false, 1, &[("AD", "Additional driver", 1_500)]),
    (
        "Tolls",
        false,
        1,
        &[("T4", "Toll pass", 600), ("T2", "Vignette", 400)],
    ),
];

const ASSISTANT_REPLIES: [&str; 5] = [
    "Here are a few cars that fit what you described.",
    "Based on that, I picked some options with more room.",
    "These come with protection packages that match your trip.",
    "I added a couple of extras you might find useful.",
    "Take a look at the updated list on the left.",
];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    fn bool(&mut self) -> bool {
        (self.next_u64() & 1) == 1
    }
}

/// Seeded generator for rental catalogs. The same seed always yields the
/// same sequence.
#[derive(Debug, Clone)]
pub struct CatalogFaker {
    rng: DeterministicRng,
    seed: u64,
    next_car: u64,
}

impl CatalogFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
            next_car: 1,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn car(&mut self) -> Car {
        let (brand, model, group_type) = VEHICLES[self.rng.int_n(VEHICLES.len())];
        let days = self.int_range(2, 7);
        let daily_cents = self.int_range(35, 140) * 100 + self.int_range(0, 9) * 10;
        let fuel_type = self.pick(&FUEL_TYPES);
        let transmission = if fuel_type == "Electric" {
            "Automatic"
        } else {
            self.pick(&TRANSMISSIONS)
        };

        let mut tags = Vec::new();
        if self.rng.int_n(3) == 0 {
            tags.push(self.pick(&CAR_TAGS).to_owned());
        }

        let id = CarId::new(format!("{}-{}", brand_prefix(brand), self.next_car));
        self.next_car += 1;

        Car {
            id,
            name: format!("{brand} {model}"),
            brand: brand.to_owned(),
            model: model.to_owned(),
            image: None,
            group_type: group_type.to_owned(),
            passengers: if group_type == "Van" { 8 } else { 5 },
            bags: self.int_range(1, 5) as u32,
            transmission: transmission.to_owned(),
            fuel_type: fuel_type.to_owned(),
            daily_price: Price::new(CURRENCY, daily_cents, "/day"),
            total_price: Price::new(CURRENCY, daily_cents * days, ""),
            tags,
        }
    }

    pub fn cars(&mut self, count: usize) -> Vec<Car> {
        (0..count).map(|_| self.car()).collect()
    }

    /// Packages ordered from no cover to full cover.
    pub fn protections(&mut self) -> Vec<Protection> {
        let nudge = 1 + self.rng.int_n(PROTECTIONS.len() - 1);
        PROTECTIONS
            .iter()
            .enumerate()
            .map(|(index, (name, stars))| {
                let covered = index * 2;
                let includes = COVERAGE[..covered.min(COVERAGE.len())]
                    .iter()
                    .map(|(id, title)| coverage_item(id, title))
                    .collect();
                let excludes = COVERAGE[covered.min(COVERAGE.len())..]
                    .iter()
                    .map(|(id, title)| coverage_item(id, title))
                    .collect();
                let deductible = (index > 0 && index < PROTECTIONS.len() - 1)
                    .then(|| Price::new(CURRENCY, 150_000 / index as i64, ""));
                let total = index as i64 * (self.int_range(8, 14) * 100);
                Protection {
                    id: ProtectionId::new(format!("P{index}")),
                    name: (*name).to_owned(),
                    deductible,
                    rating_stars: *stars,
                    includes,
                    excludes,
                    total_price: Price::new(CURRENCY, total, ""),
                    is_nudge: index == nudge,
                }
            })
            .collect()
    }

    pub fn add_ons(&mut self) -> Vec<AddOn> {
        ADD_ON_GROUPS
            .iter()
            .enumerate()
            .map(|(index, (name, multi, limit, options))| AddOn {
                id: AddOnId::new(index as i64 + 1),
                name: (*name).to_owned(),
                options: options
                    .iter()
                    .map(|(charge, title, cents)| AddOnOption {
                        charge_id: ChargeId::new(*charge),
                        title: (*title).to_owned(),
                        description: format!("{title} for the whole rental"),
                        tags: Vec::new(),
                        price: Price::new(CURRENCY, *cents, "/day"),
                        enabled: self.rng.int_n(6) != 0,
                        strategy: SelectionStrategy {
                            multi_selection_allowed: *multi,
                            max_selection_limit: *limit,
                        },
                    })
                    .collect(),
            })
            .collect()
    }

    pub fn catalog(&mut self, car_count: usize) -> Catalog {
        let cars = self.cars(car_count);
        let protections = self.protections();
        let add_ons = if self.rng.bool() || car_count > 2 {
            self.add_ons()
        } else {
            Vec::new()
        };
        Catalog {
            cars,
            protections,
            add_ons,
        }
    }

    pub fn assistant_reply(&mut self) -> String {
        self.pick(&ASSISTANT_REPLIES).to_owned()
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn int_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }
}

fn coverage_item(id: &str, title: &str) -> CoverageItem {
    CoverageItem {
        id: CoverageId::new(id),
        title: title.to_owned(),
        description: String::new(),
        tags: Vec::new(),
    }
}

pub fn temp_config_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let config_path = dir.path().join("config.toml");
    Ok((dir, config_path))
}

pub fn fixture_booking_id() -> &'static str {
    "DEMO-0001"
}

pub fn brand_prefix(brand: &str) -> String {
    brand
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(3)
        .collect::<String>()
        .to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::{CatalogFaker, brand_prefix, temp_config_path};
    use anyhow::Result;
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = CatalogFaker::new(42);
        let mut right = CatalogFaker::new(42);
        assert_eq!(left.catalog(3), right.catalog(3));
    }

    #[test]
    fn zero_seed_is_normalized() {
        assert_eq!(CatalogFaker::new(0).seed(), 1);
    }

    #[test]
    fn car() {
        let mut faker = CatalogFaker::new(1);
        let car = faker.car();

        assert!(!car.name.is_empty());
        assert!(car.name.starts_with(&car.brand));
        assert!(car.daily_price.amount_cents >= 3_500);
        assert!(car.total_price.amount_cents >= car.daily_price.amount_cents * 2);
        assert_eq!(car.daily_price.suffix, "/day");
        if car.fuel_type == "Electric" {
            assert_eq!(car.transmission, "Automatic");
        }
    }

    #[test]
    fn car_ids_are_unique_within_a_faker() {
        let mut faker = CatalogFaker::new(5);
        let ids = faker
            .cars(20)
            .into_iter()
            .map(|car| car.id)
            .collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), 20);
    }

    #[test]
    fn protections_have_exactly_one_nudge() {
        let mut faker = CatalogFaker::new(7);
        let protections = faker.protections();
        assert_eq!(protections.len(), 4);
        assert_eq!(protections.iter().filter(|p| p.is_nudge).count(), 1);
        assert!(protections[0].includes.is_empty());
        assert_eq!(protections[0].total_price.amount_cents, 0);
        assert!(protections[3].excludes.is_empty());
    }

    #[test]
    fn add_on_strategies_follow_groups() {
        let mut faker = CatalogFaker::new(9);
        let add_ons = faker.add_ons();
        assert_eq!(add_ons.len(), 3);
        assert!(add_ons[0].options[0].strategy.multi_selection_allowed);
        assert_eq!(add_ons[0].options[0].strategy.max_selection_limit, 2);
        assert!(!add_ons[1].options[0].strategy.multi_selection_allowed);
    }

    #[test]
    fn variety_across_seeds() {
        let mut names = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            let mut faker = CatalogFaker::new(seed);
            names.insert(faker.car().name);
        }
        assert!(names.len() >= 4, "got {}", names.len());
    }

    #[test]
    fn brand_prefix_skips_punctuation() {
        assert_eq!(brand_prefix("Mercedes-Benz"), "MER");
        assert_eq!(brand_prefix("VW"), "VW");
    }

    #[test]
    fn temp_config_path_lives_in_temp_dir() -> Result<()> {
        let (dir, path) = temp_config_path()?;
        assert!(path.starts_with(dir.path()));
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn int_n() {
        let mut faker = CatalogFaker::new(42);
        for _ in 0..100 {
            assert!(faker.int_n(5) < 5);
        }
    }
}
