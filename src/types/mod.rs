pub mod chart_request;
pub mod source_input;
pub mod traits;
pub mod variable;
