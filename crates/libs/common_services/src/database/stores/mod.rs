pub mod collaboration_store;
pub mod playlist_store;
pub mod user_store;
