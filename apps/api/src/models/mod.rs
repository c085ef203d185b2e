pub mod feedback;
pub mod learning;
pub mod profile;
pub mod resume;
