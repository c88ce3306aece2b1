//! FruitBot Library
//!
//! Discord notification bot for the Blox Fruits shop

pub mod bot;
pub mod config;
pub mod discord;
pub mod notify;
pub mod stock;
pub mod types;
