//! Database entities.

#![allow(missing_docs)]

pub mod form;
pub mod section;
pub mod stat;
pub mod user;

pub use form::Entity as Form;
pub use section::Entity as Section;
pub use stat::Entity as Stat;
pub use user::Entity as User;
