pub mod handlers;
pub mod session;
pub mod voice;
pub mod volume;
