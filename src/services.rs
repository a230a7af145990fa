pub mod auth;
pub mod color_scale;
pub mod donation_service;
pub mod live;
pub mod map_service;
pub mod provider;
pub mod seed;
pub mod supply_service;
pub mod zone_aggregator;
