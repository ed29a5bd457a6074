use serde::{Deserialize, Serialize};

/// A reference to another resource, serialized as `{"id": 3}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
}

impl EntityRef {
    pub fn new(id: i64) -> Self {
        Self { id }
    }
}

/// One scheduled work period for a car and/or a safety driver.
///
/// `id` is `None` until the store assigns one. `start <= end` is assumed by
/// callers but never checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub car: Option<EntityRef>,
    #[serde(default)]
    pub safety_driver: Option<EntityRef>,
    pub start: i64,
    pub end: i64,
}

impl Shift {
    pub fn new(car: Option<i64>, safety_driver: Option<i64>, start: i64, end: i64) -> Self {
        Self {
            id: None,
            car: car.map(EntityRef::new),
            safety_driver: safety_driver.map(EntityRef::new),
            start,
            end,
        }
    }
}

/// Licence of a safety driver for a car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarLicence {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub licence: Option<String>,
    #[serde(default)]
    pub car: Option<EntityRef>,
    #[serde(default)]
    pub safety_driver: Option<EntityRef>,
}

// Query strings for the shift lookups

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextShiftQuery {
    pub safety_driver: i64,
    pub start: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapQuery {
    #[serde(default)]
    pub car: Option<i64>,
    #[serde(default)]
    pub safety_driver: Option<i64>,
    pub start: i64,
    pub end: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    pub query: String,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}
