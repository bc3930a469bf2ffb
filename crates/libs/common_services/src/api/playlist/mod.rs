pub mod access;
pub mod error;
pub mod interfaces;
pub mod service;
