//! DTOs for signs_sea adapter.

/// DTO for inserting one sign during seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignCreate {
    pub id: String,
    pub level: i32,
    pub sign_type: String,
    pub reward_code: String,
}

impl SignCreate {
    pub fn new(
        id: impl Into<String>,
        level: i32,
        sign_type: impl Into<String>,
        reward_code: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            sign_type: sign_type.into(),
            reward_code: reward_code.into(),
        }
    }
}
