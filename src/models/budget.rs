use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BudgetLine {
    pub budget_id: i64,
    pub trip_id: i64,
    pub category: String,
    pub estimated_amount: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBudgetLine {
    pub category: Option<String>,
    pub estimated_amount: Option<f64>,
}
