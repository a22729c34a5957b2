pub mod cache;
pub mod config;
pub mod release;
pub mod web;
