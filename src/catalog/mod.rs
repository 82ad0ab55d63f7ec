//! Client side of the music catalog and playlist service

pub mod api;
pub mod auth;
pub mod error;
pub mod playlist;
pub mod resolver;
pub mod session;
