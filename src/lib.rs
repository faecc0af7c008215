//! LifeLink - simulated emergency dispatch
//!
//! Patient and driver dispatch lifecycles, a damped position simulator, and
//! the hospital and control center boards, driven from a CLI.

pub mod auth;
pub mod board;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod map;
pub mod session;
pub mod simulation;
