pub mod attempt;
pub mod drain;
pub mod result;
pub mod trainer;
