// src/utils/mod.rs

pub mod format;
pub mod jwt;
