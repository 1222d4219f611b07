//! Library crate for find-numbers-back, exposing modules for binaries and integration tests.

#[cfg(feature = "client")]
pub mod client;
pub mod config;
pub mod dao;
pub mod dto;
pub mod error;
pub mod game;
pub mod routes;
pub mod services;
pub mod state;
