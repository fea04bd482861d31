//! HTML template rendering handlers.

mod inbox;
mod login;
mod portal;

pub use inbox::inbox_handler;
pub use login::login_handler;
pub use portal::portal_handler;
