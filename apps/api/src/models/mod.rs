pub mod preference;
pub mod profile;
