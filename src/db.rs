pub mod organization_repo;
pub use organization_repo::OrganizationRepository;
pub mod region_repo;
pub use region_repo::RegionRepository;
pub mod supply_repo;
pub use supply_repo::SupplyRepository;
pub mod donation_repo;
pub use donation_repo::DonationRepository;
pub mod token_repo;
pub use token_repo::TokenRepository;
