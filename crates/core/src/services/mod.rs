//! Business logic services.

#![allow(missing_docs)]

pub mod auth;
pub mod form;
pub mod seed;
pub mod stats;
pub mod submission;
pub mod user;

pub use auth::{AuthService, Claims};
pub use form::{CreateFormInput, FormService, FormWithSections, SectionSpec};
pub use seed::SeedService;
pub use stats::{FormStats, OptionStat, SectionStats, StatsService};
pub use submission::{AnswerInput, AnswerOutcome, SubmissionInput, SubmissionService};
pub use user::{CreateUserInput, ListScope, UserService};
