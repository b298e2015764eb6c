//! Data models for the inventory server

pub mod file;
pub mod loan;
pub mod material;
