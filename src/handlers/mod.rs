pub mod employee;
pub mod health;
pub mod pages;
pub mod user;
