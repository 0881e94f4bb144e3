//! Query modules for the tables boardmend owns or reads directly.

pub mod containers;
pub mod session;
pub mod settings;
