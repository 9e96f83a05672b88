pub mod env;
pub mod error;
pub mod git;
pub mod model;
pub mod params;
pub mod payload;
pub mod provider;
pub mod upload;
