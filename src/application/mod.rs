// Application layer - Use cases and the collaborators they depend on
pub mod card_updater;
pub mod fleet_repository;
pub mod fleet_service;
pub mod polling;
pub mod registration_service;
pub mod renderer;

#[cfg(test)]
pub mod test_support;
