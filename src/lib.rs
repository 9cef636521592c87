// lib.rs - Library exports for the range-order lifecycle coordinator

pub mod config;
pub mod error;
pub mod models;
pub mod bootstrap;
pub mod chain;
pub mod engine;
