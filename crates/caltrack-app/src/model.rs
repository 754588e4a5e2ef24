// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::ids::*;

/// Discriminator carried by every activity. `1` is food; every other value
/// is treated as exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActivityCategory(i64);

impl ActivityCategory {
    pub const FOOD: Self = Self(1);
    pub const EXERCISE: Self = Self(2);

    pub const CHOICES: [Self; 2] = [Self::FOOD, Self::EXERCISE];

    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    pub const fn is_food(self) -> bool {
        self.0 == Self::FOOD.0
    }

    pub const fn list_mode(self) -> ListMode {
        if self.is_food() {
            ListMode::Food
        } else {
            ListMode::Exercise
        }
    }

    pub const fn label(self) -> &'static str {
        self.list_mode().as_str()
    }
}

impl Default for ActivityCategory {
    fn default() -> Self {
        Self::FOOD
    }
}

impl From<i64> for ActivityCategory {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Static reference entry offered by the name selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: &'static str,
    pub details: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub category: ActivityCategory,
    pub name: String,
    pub calories: i64,
    pub details: String,
}

impl Activity {
    /// Blank draft with a fresh id, as shown by an idle form.
    pub fn blank() -> Self {
        Self {
            id: ActivityId::generate(),
            category: ActivityCategory::FOOD,
            name: String::new(),
            calories: 0,
            details: String::new(),
        }
    }

    pub fn details(&self) -> Option<&str> {
        let trimmed = self.details.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ListMode {
    #[default]
    Food,
    Exercise,
}

impl ListMode {
    pub const ALL: [Self; 2] = [Self::Food, Self::Exercise];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Exercise => "exercise",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "food" => Some(Self::Food),
            "exercise" => Some(Self::Exercise),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Food => Self::Exercise,
            Self::Exercise => Self::Food,
        }
    }

    pub fn matches(self, category: ActivityCategory) -> bool {
        match self {
            Self::Food => category.is_food(),
            Self::Exercise => !category.is_food(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppMode {
    Nav,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CalorieSummary {
    pub consumed: i64,
    pub burned: i64,
}

impl CalorieSummary {
    pub fn from_activities(activities: &[Activity]) -> Self {
        activities
            .iter()
            .fold(Self::default(), |mut summary, activity| {
                if activity.category.is_food() {
                    summary.consumed = summary.consumed.saturating_add(activity.calories);
                } else {
                    summary.burned = summary.burned.saturating_add(activity.calories);
                }
                summary
            })
    }

    pub const fn net(self) -> i64 {
        self.consumed.saturating_sub(self.burned)
    }
}
