//! SeaORM adapters. Functions return `DbErr`; repos map to `DomainError`.

pub mod draw_records_sea;
pub mod guest_states_sea;
pub mod signs_sea;
