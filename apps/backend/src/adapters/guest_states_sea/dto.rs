//! DTOs for guest_states_sea adapter.

/// DTO for the first state row of a guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestStateCreate {
    pub guest_id: String,
    pub last_round: i16,
    pub last_won: bool,
    pub round_index: i32,
}

/// DTO for advancing a guest's state under optimistic locking.
///
/// `expected_version` must match the stored version for the update to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestStateUpdate {
    pub guest_id: String,
    pub last_round: i16,
    pub last_won: bool,
    pub round_index: i32,
    pub expected_version: i32,
}
