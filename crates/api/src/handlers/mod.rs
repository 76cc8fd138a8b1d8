//! REST-Handler Module

pub mod admin;
pub mod auth;
pub mod stories;
