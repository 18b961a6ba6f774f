//! Data contracts shared between the vehicles backend and its clients.

pub mod domain;
