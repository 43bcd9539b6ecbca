//! IP-Rotate: client-identity header rotation
//!
//! A library for injecting a generated IPv4 address into outgoing
//! client-identity headers (`X-Forwarded-For`, `X-Real-IP`, `Forwarded`, ...)
//! through a single declarative header-rewrite rule, and rotating that
//! address on a timer.

pub mod address;
mod atomic;
pub mod config;
pub mod engine;
pub mod rule;
pub mod schedule;
pub mod service;
pub mod settings;
pub mod state;
pub mod time;
