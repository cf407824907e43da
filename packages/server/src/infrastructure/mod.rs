//! Infrastructure layer: wire DTOs, the in-memory room registry and broadcast fan-out.

pub mod broadcast;
pub mod dto;
pub mod repository;
