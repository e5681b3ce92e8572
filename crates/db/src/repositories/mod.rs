//! Database repositories.

mod form;
mod section;
mod stat;
mod user;

pub use form::FormRepository;
pub use section::SectionRepository;
pub use stat::StatRepository;
pub use user::UserRepository;
