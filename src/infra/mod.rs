pub mod address;
pub mod tonapi;
