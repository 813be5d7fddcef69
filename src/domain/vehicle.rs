use serde::Serialize;

/// Oldest accepted model year (first self-propelled vehicle).
pub const MIN_YEAR: i32 = 1769;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub brand: String,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    pub name: String,
    pub brand: String,
    pub year: i32,
}

impl NewVehicle {
    pub fn validate(
        name: &str,
        brand: &str,
        year: i32,
        current_year: i32,
    ) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        if name.trim().is_empty() {
            errors.push("Vehicle name cannot be empty".to_string());
        }
        if brand.trim().is_empty() {
            errors.push("Vehicle brand cannot be empty".to_string());
        }
        if year < MIN_YEAR {
            errors.push(format!("{name}'s year cannot be too old, just above {MIN_YEAR}"));
        }
        if year > current_year {
            errors.push(format!("{name}'s year cannot be in the future"));
        }

        if errors.is_empty() {
            Ok(Self {
                name: name.trim().to_string(),
                brand: brand.trim().to_string(),
                year,
            })
        } else {
            Err(errors)
        }
    }
}

/// Case-insensitive substring filters for listing.
#[derive(Debug, Clone, Default)]
pub struct VehicleFilter {
    pub name: Option<String>,
    pub brand: Option<String>,
}

impl VehicleFilter {
    pub fn new(name: Option<String>, brand: Option<String>) -> Self {
        let clean = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            name: clean(name),
            brand: clean(brand),
        }
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            needle
                .as_ref()
                .is_none_or(|n| haystack.to_lowercase().contains(&n.to_lowercase()))
        }
        contains(&vehicle.name, &self.name) && contains(&vehicle.brand, &self.brand)
    }
}
