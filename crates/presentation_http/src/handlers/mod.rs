//! HTTP request handlers

pub mod common;
pub mod conversation;
pub mod health;
pub mod scenarios;
pub mod voice;
