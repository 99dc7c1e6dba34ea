//! DTOs for draw_records_sea adapter.

/// DTO for appending one draw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecordCreate {
    pub guest_id: String,
    pub draw_round: i16,
    pub won: bool,
    pub tier: Option<String>,
    pub prize_image_url: Option<String>,
    pub round_index: i32,
}
