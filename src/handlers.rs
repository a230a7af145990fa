pub mod auth;
pub mod donations;
pub mod live;
pub mod organizations;
pub mod regions;
pub mod zones;
