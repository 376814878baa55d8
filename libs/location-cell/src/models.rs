// libs/location-cell/src/models.rs
use serde::Deserialize;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LocationRow {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub doctor_id: Option<i32>,
}
