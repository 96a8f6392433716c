pub mod backend_steps;
pub mod marker_steps;
pub mod panel_steps;
pub mod theme_steps;
