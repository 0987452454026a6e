//! Domain model module declarations.

pub mod approval;
pub mod button;
