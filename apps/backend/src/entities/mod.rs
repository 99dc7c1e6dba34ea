pub mod draw_records;
pub mod guest_round_states;
pub mod signs;

pub use draw_records::Entity as DrawRecords;
pub use draw_records::Model as DrawRecord;
pub use guest_round_states::Entity as GuestRoundStates;
pub use guest_round_states::Model as GuestRoundState;
pub use signs::Entity as Signs;
pub use signs::Model as Sign;
