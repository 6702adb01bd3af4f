pub mod cartesi;
pub mod database;
