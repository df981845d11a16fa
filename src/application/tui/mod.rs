pub mod month_view;
pub mod theme;

pub use month_view::*;
pub use theme::*;
