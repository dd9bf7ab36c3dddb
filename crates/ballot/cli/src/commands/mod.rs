//! Command implementations

pub mod demo;
pub mod inspect;
pub mod run;
