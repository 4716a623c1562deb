//! Conversion categories
//!
//! A category is a family of mutually convertible units. The set is closed
//! and ordered the way the category picker lists it.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Family of mutually convertible units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Temperature,
    Length,
    Mass,
    Duration,
    Speed,
    Volume,
}

impl Category {
    /// All categories in picker order. Index 0 is the initial category.
    pub const ALL: [Category; 6] = [
        Category::Temperature,
        Category::Length,
        Category::Mass,
        Category::Duration,
        Category::Speed,
        Category::Volume,
    ];

    /// Machine-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Category::Temperature => "temperature",
            Category::Length => "length",
            Category::Mass => "mass",
            Category::Duration => "duration",
            Category::Speed => "speed",
            Category::Volume => "volume",
        }
    }

    /// Label shown in the category picker
    pub fn title(&self) -> &'static str {
        match self {
            Category::Temperature => "Temperature",
            Category::Length => "Distance",
            Category::Mass => "Mass",
            Category::Duration => "Time",
            Category::Speed => "Speed",
            Category::Volume => "Volume",
        }
    }

    /// Key of the canonical base unit every conversion passes through
    pub fn base_unit_key(&self) -> &'static str {
        match self {
            Category::Temperature => "kelvin",
            Category::Length => "meters",
            Category::Mass => "kilograms",
            Category::Duration => "seconds",
            Category::Speed => "meters_per_second",
            Category::Volume => "liters",
        }
    }

    /// Position in picker order
    pub fn index(&self) -> usize {
        match self {
            Category::Temperature => 0,
            Category::Length => 1,
            Category::Mass => 2,
            Category::Duration => 3,
            Category::Speed => 4,
            Category::Volume => 5,
        }
    }

    /// Look up a category by machine name or picker title (case-insensitive)
    pub fn from_name(s: &str) -> Option<Category> {
        match s.trim().to_lowercase().as_str() {
            "temperature" | "temp" => Some(Category::Temperature),
            "length" | "distance" => Some(Category::Length),
            "mass" | "weight" => Some(Category::Mass),
            "duration" | "time" => Some(Category::Duration),
            "speed" | "velocity" => Some(Category::Speed),
            "volume" => Some(Category::Volume),
            _ => None,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::ALL[0]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
