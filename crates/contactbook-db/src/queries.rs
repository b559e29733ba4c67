//! Database query functions organized by table.

pub mod contacts;
pub mod methods;
