// src/lib.rs
//! Plan-driven scaffolding for Astro theme projects: planners build a list of
//! [`action::Action`]s and the [`executor::Executor`] applies it.

pub mod action;
pub mod backup;
pub mod case;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod executor;
pub mod fsops;
pub mod plans;
pub mod prompt;
pub mod template;
pub mod workspace;
