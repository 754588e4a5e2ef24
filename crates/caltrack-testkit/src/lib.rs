// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use caltrack_app::{Activity, ActivityCategory, ActivityId, catalog};
use uuid::Uuid;

// Typical calorie span per reference name: (name, min, max).
const FOOD_CALORIES: [(&str, i64, i64); 8] = [
    ("Jugo", 90, 320),
    ("Ensalada", 120, 450),
    ("Tacos", 350, 900),
    ("Fruta", 50, 200),
    ("Pan", 150, 420),
    ("Cafe", 5, 250),
    ("Pollo asado", 300, 750),
    ("Arroz", 200, 500),
];

const EXERCISE_CALORIES: [(&str, i64, i64); 6] = [
    ("Pesas", 150, 450),
    ("Correr", 250, 800),
    ("Bicicleta", 200, 700),
    ("Natacion", 250, 650),
    ("Yoga", 90, 300),
    ("Caminar", 80, 350),
];

const DETAIL_WORDS: [&str; 20] = [
    "morning", "evening", "quick", "long", "light", "heavy", "homemade", "outdoor", "gym",
    "park", "sin", "azucar", "extra", "small", "large", "after", "work", "lunch", "weekend",
    "intervals",
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

/// Reproducible activity generator. The same seed yields the same sequence
/// of activities, ids included.
#[derive(Debug, Clone)]
pub struct ActivityFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl ActivityFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn activity_id(&mut self) -> ActivityId {
        let high = self.rng.next_u64();
        let low = self.rng.next_u64();
        let uuid = uuid::Builder::from_random_bytes(Uuid::from_u64_pair(high, low).into_bytes())
            .into_uuid();
        ActivityId::from_uuid(uuid)
    }

    pub fn activity(&mut self) -> Activity {
        if self.rng.bool() {
            self.food()
        } else {
            self.exercise()
        }
    }

    pub fn food(&mut self) -> Activity {
        self.activity_in(ActivityCategory::FOOD, &FOOD_CALORIES)
    }

    pub fn exercise(&mut self) -> Activity {
        self.activity_in(ActivityCategory::EXERCISE, &EXERCISE_CALORIES)
    }

    pub fn activities(&mut self, count: usize) -> Vec<Activity> {
        (0..count).map(|_| self.activity()).collect()
    }

    fn activity_in(
        &mut self,
        category: ActivityCategory,
        spans: &[(&'static str, i64, i64)],
    ) -> Activity {
        let (name, min, max) = spans[self.rng.int_n(spans.len())];
        let calories = self.int_range_i64(min, max);
        let details = if self.rng.int_n(3) == 0 {
            String::new()
        } else {
            self.phrase(1, 3)
        };
        Activity {
            id: self.activity_id(),
            category,
            name: name.to_owned(),
            calories,
            details,
        }
    }

    fn int_range_i64(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        let span = max - min + 1;
        min + (self.rng.next_u64() % (span as u64)) as i64
    }

    fn phrase(&mut self, min_words: usize, max_words: usize) -> String {
        let count = min_words + self.rng.int_n(max_words.saturating_sub(min_words) + 1);
        (0..count)
            .map(|_| DETAIL_WORDS[self.rng.int_n(DETAIL_WORDS.len())])
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `{id, category, name, calories}` without details, for hand-written
/// scenarios.
pub fn activity(category: ActivityCategory, name: &str, calories: i64) -> Activity {
    Activity {
        id: ActivityId::generate(),
        category,
        name: name.to_owned(),
        calories,
        details: String::new(),
    }
}

pub fn food_names() -> Vec<&'static str> {
    catalog::FOOD_CATEGORIES
        .iter()
        .map(|entry| entry.name)
        .collect()
}

pub fn exercise_names() -> Vec<&'static str> {
    catalog::EXERCISE_CATEGORIES
        .iter()
        .map(|entry| entry.name)
        .collect()
}
