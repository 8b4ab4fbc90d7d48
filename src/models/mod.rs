// src/models/mod.rs

pub mod assessment;
pub mod attempt;
pub mod catalog;
pub mod dashboard;
pub mod roadmap;
pub mod user;
