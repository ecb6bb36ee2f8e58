use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaseRecord {
    pub lease_id: String,
    pub user_id: String,
    pub action_id: String,
    pub scope: String,
    pub issued_at: i64,
    pub exp: i64,
    pub used: bool,
}

impl LeaseRecord {
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.exp
    }
}
