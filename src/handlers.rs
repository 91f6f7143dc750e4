// src/handlers.rs

pub mod agencies;
pub mod auth;
pub mod catalog;
pub mod clients;
pub mod companies;
pub mod content;
pub mod gateways;
pub mod orders;
pub mod shell;
