// src/lib.rs

pub mod api;
pub mod catalog;
pub mod common;
pub mod config;
pub mod mappers;
pub mod models;
pub mod services;
pub mod training;
pub mod workflow;

pub use common::error::AppError;
pub use services::{SmcrState, SmcrStore};
