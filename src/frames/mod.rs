pub mod canonical_frame;
pub mod filtered_frame;
