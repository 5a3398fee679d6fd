pub mod correlation;
pub mod monthly;
pub mod summary;
