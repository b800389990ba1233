// src/lib.rs
pub mod backend;
pub mod config;
pub mod errors;
pub mod launcher;
pub mod models;
