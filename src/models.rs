// src/models.rs

pub mod activity;
pub mod address;
pub mod agency;
pub mod auth;
pub mod bank;
pub mod company;
pub mod contact;
pub mod content;
pub mod gateway;
pub mod mileage;
pub mod navigation;
pub mod order;
