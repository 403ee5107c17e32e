// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod photo;
pub mod resource;

pub use photo::*;
pub use resource::*;
