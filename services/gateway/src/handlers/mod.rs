pub mod items;
pub mod ratings;
pub mod trades;
