pub mod imputer;
pub mod warning;
