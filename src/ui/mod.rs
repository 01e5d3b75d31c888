pub mod app;
pub mod view;

pub use app::{App, Mode};
pub use view::{render, render_loading};
