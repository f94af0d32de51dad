pub mod display_row;
pub mod transaction;
