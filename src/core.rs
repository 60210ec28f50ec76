// src/core.rs
pub mod jobs;
pub mod normalize;
pub mod report;
pub mod scanner;
pub mod tags;
