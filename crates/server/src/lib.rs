//! HTTP server for the pod recommendation service

pub mod api;
pub mod config;
