//! External process collaborators

pub mod ctime;
pub mod subprocess;
