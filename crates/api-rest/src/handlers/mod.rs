pub mod health;
pub mod patient;
pub mod staff;
