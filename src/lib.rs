//! Client-side core of a student-housing listing service: a typed REST
//! client, a persistent session store, and a pure in-memory filter/sort
//! engine over fetched listings.

pub mod api;
pub mod config;
pub mod models;
pub mod search;
pub mod session;
