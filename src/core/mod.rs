//! Transaction generators, balance services, and the time source abstraction.

pub mod services;
pub mod time;
