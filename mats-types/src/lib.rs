pub mod app_params;
pub mod catalog;
pub mod dataset;
pub mod plot_params;
pub mod series;
pub mod text_pattern;
