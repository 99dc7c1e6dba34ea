//! Repository functions for the domain layer. Return `DomainError`.

pub mod draw_records;
pub mod guest_states;
pub mod signs;
