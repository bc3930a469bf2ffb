pub mod app_user;
pub mod collaboration;
pub mod playlist;
pub mod song;
