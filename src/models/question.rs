use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question_text: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub question_type: String,
    /// 1 = easy, 2 = medium, 3 = hard. Imports leave the column default.
    pub difficulty: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
