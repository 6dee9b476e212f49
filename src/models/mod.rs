// src/models/mod.rs

pub mod leaderboard;
pub mod participant;
pub mod quiz_result;
