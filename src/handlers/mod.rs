// src/handlers/mod.rs

pub mod assessment;
pub mod dashboard;
pub mod domains;
pub mod health;
pub mod roadmap;
