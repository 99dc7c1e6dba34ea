pub mod guest_id;

pub use guest_id::GuestId;
