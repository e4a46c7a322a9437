mod handlers;
mod renderer;
mod routes;
mod types;


pub use renderer::{Clock, Page, PageRenderer, SystemClock};
pub use routes::{create_router, PagesState};
pub use types::PageError;
