//! External-action collaborators and filesystem primitives used by jobs.
pub mod appx;
pub mod chocolatey;
pub mod copy;
pub mod env_var;
pub mod paths;
pub mod powershell;
pub mod registry;
