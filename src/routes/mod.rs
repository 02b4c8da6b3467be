pub mod companies;
pub mod dashboard;
pub mod health;
pub mod prices;
