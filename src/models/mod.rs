pub mod listing;
pub mod symbol;
