use serde::{Deserialize, Serialize};

use super::enums::ServiceCategory;

/// Catalog entry. Appointments copy `name` and `price` at booking time;
/// `material_cost` is joined live when computing profit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
    pub material_cost: f64,
    pub indirect_cost: f64,
    pub category: ServiceCategory,
    pub description: Option<String>,
}
