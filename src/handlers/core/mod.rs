//! Core handler infrastructure: the subscription table and dispatch.

pub mod registry;
