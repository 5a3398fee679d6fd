pub mod boxplot;
pub mod chart_data;
pub mod histogram;
