// ABOUTME: Built-in catalog of common Indian and international foods with per-100 g values
// ABOUTME: Offline search by name or category for quick meal entry
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use crate::constants::limits;
use crate::models::NutritionFacts;
use serde::Serialize;

/// A catalog entry, values per 100 g unless the name says otherwise
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CommonFood {
    /// Display name
    pub name: &'static str,
    /// Calories (kcal)
    pub calories: f64,
    /// Protein (g)
    pub protein: f64,
    /// Carbohydrates (g)
    pub carbs: f64,
    /// Fat (g)
    pub fat: f64,
    /// Food group
    pub category: &'static str,
}

impl CommonFood {
    const fn new(
        name: &'static str,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
        category: &'static str,
    ) -> Self {
        Self {
            name,
            calories,
            protein,
            carbs,
            fat,
            category,
        }
    }

    /// Nutrition values as facts
    #[must_use]
    pub const fn facts(&self) -> NutritionFacts {
        NutritionFacts::new(self.calories, self.protein, self.carbs, self.fat)
    }
}

/// The catalog
pub static COMMON_FOODS: [CommonFood; 32] = [
    // Indian staples
    CommonFood::new("Roti (Wheat)", 297.0, 11.0, 61.0, 4.0, "Grains"),
    CommonFood::new("Rice (Cooked)", 130.0, 3.0, 28.0, 0.0, "Grains"),
    CommonFood::new("Dal (Cooked)", 116.0, 9.0, 20.0, 0.0, "Legumes"),
    CommonFood::new("Chicken Tikka", 186.0, 25.0, 5.0, 8.0, "Meat"),
    CommonFood::new("Paneer", 265.0, 18.0, 4.0, 21.0, "Dairy"),
    CommonFood::new("Curd/Yogurt", 60.0, 3.0, 5.0, 3.0, "Dairy"),
    CommonFood::new("Chapati", 297.0, 11.0, 61.0, 4.0, "Grains"),
    CommonFood::new("Paratha", 320.0, 8.0, 45.0, 12.0, "Grains"),
    CommonFood::new("Biryani", 200.0, 8.0, 35.0, 4.0, "Mixed"),
    CommonFood::new("Rajma", 127.0, 9.0, 23.0, 0.0, "Legumes"),
    CommonFood::new("Chole", 164.0, 8.0, 27.0, 3.0, "Legumes"),
    CommonFood::new("Samosa", 308.0, 6.0, 28.0, 19.0, "Snacks"),
    // Proteins
    CommonFood::new("Chicken Breast", 165.0, 31.0, 0.0, 4.0, "Meat"),
    CommonFood::new("Fish (Salmon)", 208.0, 20.0, 0.0, 13.0, "Fish"),
    CommonFood::new("Eggs (2 large)", 155.0, 13.0, 1.0, 11.0, "Eggs"),
    CommonFood::new("Mutton", 294.0, 25.0, 0.0, 21.0, "Meat"),
    CommonFood::new("Prawns", 99.0, 18.0, 1.0, 1.0, "Seafood"),
    // Vegetables
    CommonFood::new("Mixed Vegetables", 65.0, 3.0, 13.0, 0.0, "Vegetables"),
    CommonFood::new("Spinach (Palak)", 23.0, 3.0, 4.0, 0.0, "Vegetables"),
    CommonFood::new("Potato", 77.0, 2.0, 17.0, 0.0, "Vegetables"),
    CommonFood::new("Onion", 40.0, 1.0, 9.0, 0.0, "Vegetables"),
    CommonFood::new("Tomato", 18.0, 1.0, 4.0, 0.0, "Vegetables"),
    // Fruits
    CommonFood::new("Apple", 52.0, 0.0, 14.0, 0.0, "Fruits"),
    CommonFood::new("Banana", 89.0, 1.0, 23.0, 0.0, "Fruits"),
    CommonFood::new("Orange", 47.0, 1.0, 12.0, 0.0, "Fruits"),
    CommonFood::new("Mango", 60.0, 1.0, 15.0, 0.0, "Fruits"),
    // Snacks and others
    CommonFood::new("Almonds (10 pieces)", 173.0, 6.0, 6.0, 15.0, "Nuts"),
    CommonFood::new("Milk (1 cup)", 103.0, 8.0, 12.0, 2.0, "Dairy"),
    CommonFood::new("Tea (with milk)", 30.0, 1.0, 4.0, 1.0, "Beverages"),
    CommonFood::new("Coffee (with milk)", 25.0, 1.0, 3.0, 1.0, "Beverages"),
    CommonFood::new("Bread (2 slices)", 160.0, 8.0, 30.0, 2.0, "Grains"),
    CommonFood::new("Oats", 389.0, 17.0, 66.0, 7.0, "Grains"),
];

/// Catalog entries whose name or category contains `query`, case-insensitively
///
/// Returns at most six matches in catalog order; queries shorter than two
/// characters match nothing.
#[must_use]
pub fn search_common_foods(query: &str) -> Vec<&'static CommonFood> {
    let term = query.trim().to_lowercase();
    if term.chars().count() < limits::MIN_FOOD_QUERY_LEN {
        return Vec::new();
    }

    COMMON_FOODS
        .iter()
        .filter(|food| {
            food.name.to_lowercase().contains(&term) || food.category.to_lowercase().contains(&term)
        })
        .take(limits::MAX_COMMON_FOOD_MATCHES)
        .collect()
}
