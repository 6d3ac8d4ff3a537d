//! Millwright - fleet maintenance tracker with rotation scheduling

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
