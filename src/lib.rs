// src/lib.rs

//! eventwatch: TruckersMP event change notifier

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
