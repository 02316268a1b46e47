pub mod admin;
pub mod dashboard;
pub mod health;
pub mod subscription;
