//! Repository implementations backed by PostgreSQL.

pub mod project;
