pub mod feedback;
pub mod preferences;
