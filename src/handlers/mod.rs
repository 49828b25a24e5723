pub mod admin;
pub mod portfolio;
pub mod system;
