// Gove services
// Stateless or configuration-level helpers used by the managers and shells.

pub mod address;
pub mod settings_engine;
