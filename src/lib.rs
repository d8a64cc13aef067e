//! Northwind association queries
//!
//! Entities mapped with `#[derive(Entity)]`, navigations between them declared
//! as association descriptors, and a translator that turns navigation inside
//! query expressions into joins and correlated subqueries over SQLite.

pub mod config;
pub mod db;
pub mod models;
pub mod orm;
pub mod queries;
