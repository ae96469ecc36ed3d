pub mod health;
pub mod videos;
