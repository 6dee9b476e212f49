// src/services/mod.rs

pub mod identity;
pub mod render;
pub mod result_store;
