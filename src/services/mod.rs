pub mod dashboard;
pub mod export;
pub mod failure_cache;
pub mod prices;
pub mod reference;
pub mod returns;
pub mod sector;
