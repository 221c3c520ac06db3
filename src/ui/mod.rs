pub mod feedback;
pub mod theme;
