// src/lib.rs
pub mod config;
pub mod domain;
pub mod persistence;
pub mod web;

pub use domain::*;
