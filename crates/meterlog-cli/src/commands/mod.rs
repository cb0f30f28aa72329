//! Command handlers

pub mod config;
pub mod export;
pub mod reading;
pub mod status;
