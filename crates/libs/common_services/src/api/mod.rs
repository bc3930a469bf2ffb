pub mod auth;
pub mod collaboration;
pub mod export;
pub mod playlist;
pub mod response;
