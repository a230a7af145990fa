pub mod country;
pub mod donation;
pub mod map;
pub mod organization;
pub mod region;
pub mod supply;
