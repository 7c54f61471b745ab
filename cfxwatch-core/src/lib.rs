// src/lib.rs

pub mod config;
pub mod http;
pub mod platforms;
pub mod services;
pub mod tasks;

pub use cfxwatch_common::error::Error;
pub use http::{DefaultHttpClient, HttpClient};
