pub mod adapters;
pub mod config;
pub mod error;
pub mod navigator;
pub mod screens;
