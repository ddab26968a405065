//! Configuration parameters in their user-facing and complete forms.

pub mod actual;
pub mod defaults;
pub mod user;
