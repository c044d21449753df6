//! Charts module - interactive plots and PNG export

mod palette;
mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
