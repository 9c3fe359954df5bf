//! Backend for the Cucina nutrition tracker.
//!
//! Three proxy routes sit between the browser and two external services:
//! a hosted LLM (food macro estimates, meal suggestions) and the Open Food
//! Facts product database.

pub mod app;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod storage;
