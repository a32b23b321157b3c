// src/plans/mod.rs
//! Planners: pure functions from a resolved configuration to a [`Plan`].
//!
//! [`Plan`]: crate::action::Plan

pub mod create;
pub mod use_theme;
