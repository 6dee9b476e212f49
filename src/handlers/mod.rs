// src/handlers/mod.rs

pub mod leaderboard;
