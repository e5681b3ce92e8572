//! Demo data seeding for fresh installations.

use canvass_common::AppResult;
use canvass_db::entities::section::SectionKind;
use tracing::info;

use super::form::{CreateFormInput, FormService, SectionSpec};
use super::user::{CreateUserInput, UserService};

/// Seeds a demo owner and two demo forms on an empty database.
#[derive(Clone)]
pub struct SeedService {
    user_service: UserService,
    form_service: FormService,
}

impl SeedService {
    /// Create a new seed service.
    #[must_use]
    pub const fn new(user_service: UserService, form_service: FormService) -> Self {
        Self {
            user_service,
            form_service,
        }
    }

    /// Seed demo data unless any account already exists.
    pub async fn run(&self) -> AppResult<()> {
        if self.user_service.count().await? > 0 {
            return Ok(());
        }

        let owner = self
            .user_service
            .create(CreateUserInput {
                email: "test@example.com".to_string(),
                password: "Password123".to_string(),
            })
            .await?;

        self.form_service
            .create(
                &owner,
                CreateFormInput {
                    title: "Customer Feedback".to_string(),
                    description: "We value your feedback".to_string(),
                    sections: vec![
                        SectionSpec {
                            title: "Rate our service".to_string(),
                            kind: SectionKind::RadioBox,
                            is_required: true,
                            options: vec![
                                "Excellent".to_string(),
                                "Good".to_string(),
                                "Poor".to_string(),
                            ],
                        },
                        SectionSpec {
                            title: "What features do you use?".to_string(),
                            kind: SectionKind::CheckBox,
                            is_required: false,
                            options: vec![
                                "Search".to_string(),
                                "History".to_string(),
                                "Profile".to_string(),
                            ],
                        },
                    ],
                },
            )
            .await?;

        self.form_service
            .create(
                &owner,
                CreateFormInput {
                    title: "Event Registration".to_string(),
                    description: "Register for the upcoming event".to_string(),
                    sections: vec![
                        SectionSpec {
                            title: "Attending?".to_string(),
                            kind: SectionKind::RadioBox,
                            is_required: true,
                            options: vec![
                                "Yes".to_string(),
                                "No".to_string(),
                                "Maybe".to_string(),
                            ],
                        },
                        SectionSpec {
                            title: "Dietary Restrictions".to_string(),
                            kind: SectionKind::CheckBox,
                            is_required: false,
                            options: vec![
                                "Vegetarian".to_string(),
                                "Vegan".to_string(),
                                "Gluten-Free".to_string(),
                            ],
                        },
                    ],
                },
            )
            .await?;

        info!(owner = %owner.email, "Seeded demo data");

        Ok(())
    }
}
