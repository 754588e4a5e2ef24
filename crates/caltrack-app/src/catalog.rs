// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{ActivityCategory, Category, CategoryId};

pub const FOOD_CATEGORIES: [Category; 8] = [
    entry(1, "Jugo", Some("fresh or bottled")),
    entry(2, "Ensalada", None),
    entry(3, "Tacos", None),
    entry(4, "Fruta", None),
    entry(5, "Pan", Some("bread and pastries")),
    entry(6, "Cafe", None),
    entry(7, "Pollo asado", None),
    entry(8, "Arroz", None),
];

pub const EXERCISE_CATEGORIES: [Category; 6] = [
    entry(1, "Pesas", Some("weight training")),
    entry(2, "Correr", None),
    entry(3, "Bicicleta", None),
    entry(4, "Natacion", None),
    entry(5, "Yoga", None),
    entry(6, "Caminar", None),
];

const fn entry(id: i64, name: &'static str, details: Option<&'static str>) -> Category {
    Category {
        id: CategoryId::new(id),
        name,
        details,
    }
}

/// Reference list backing the name selector for `category`.
pub fn options_for(category: ActivityCategory) -> &'static [Category] {
    if category.is_food() {
        &FOOD_CATEGORIES
    } else {
        &EXERCISE_CATEGORIES
    }
}

pub fn is_known_name(category: ActivityCategory, name: &str) -> bool {
    options_for(category).iter().any(|entry| entry.name == name)
}

#[cfg(test)]
mod tests {
    use super::{EXERCISE_CATEGORIES, FOOD_CATEGORIES, is_known_name, options_for};
    use crate::ActivityCategory;

    #[test]
    fn food_and_exercise_lists_are_disjoint() {
        for food in FOOD_CATEGORIES {
            assert!(
                EXERCISE_CATEGORIES.iter().all(|entry| entry.name != food.name),
                "{} appears in both lists",
                food.name
            );
        }
    }

    #[test]
    fn options_follow_category_discriminator() {
        assert_eq!(options_for(ActivityCategory::FOOD)[0].name, "Jugo");
        assert_eq!(options_for(ActivityCategory::EXERCISE)[0].name, "Pesas");
        assert_eq!(options_for(ActivityCategory::new(9))[0].name, "Pesas");
    }

    #[test]
    fn known_name_is_scoped_to_category() {
        assert!(is_known_name(ActivityCategory::FOOD, "Tacos"));
        assert!(!is_known_name(ActivityCategory::EXERCISE, "Tacos"));
    }
}
