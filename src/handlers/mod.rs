// handlers/mod.rs - one module per endpoint group
pub mod greeting;
pub mod health;
pub mod students;

pub use greeting::greeting;
pub use health::health;
