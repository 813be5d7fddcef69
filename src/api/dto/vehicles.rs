use serde::Deserialize;

use crate::domain::{NewVehicle, VehicleFilter};

#[derive(Debug, Deserialize)]
pub struct VehicleListQuery {
    pub page: Option<i64>,
    pub name: Option<String>,
    pub brand: Option<String>,
}

impl VehicleListQuery {
    pub fn filter(&self) -> VehicleFilter {
        VehicleFilter::new(self.name.clone(), self.brand.clone())
    }
}

/// Missing fields default to empty/zero so validation reports them by name.
#[derive(Debug, Deserialize)]
pub struct VehicleRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub year: i32,
}

impl VehicleRequest {
    pub fn validate(&self, current_year: i32) -> Result<NewVehicle, Vec<String>> {
        NewVehicle::validate(&self.name, &self.brand, self.year, current_year)
    }
}
