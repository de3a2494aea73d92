use kit_forms::validation::{self, Rules};
use kit_forms::{async_trait, Form, FormRequest};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Post;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UpdatePostRules {
    #[serde(deserialize_with = "validation::trim")]
    #[validate(length(min = 1, max = 120))]
    pub title: String,

    #[validate(length(min = 1, max = 120))]
    pub slug: String,
}

/// Only the author may edit a post; the author is taken from `x-user-id`
pub struct UpdatePostRequest;

#[async_trait]
impl FormRequest for UpdatePostRequest {
    type Schema = UpdatePostRules;

    fn rules(_form: &Form<Self>) -> Rules<UpdatePostRules> {
        Rules::new()
            .message("title.length", "A title between 1 and 120 characters is required.")
            .message("required", "This field is required.")
    }

    async fn authorize(form: &Form<Self>) -> bool {
        let user_id = form.header("x-user-id").and_then(|id| id.parse::<u64>().ok());

        match (form.resource::<Post>("post"), user_id) {
            (Some(post), Some(user_id)) => post.author_id == user_id,
            _ => false,
        }
    }

    async fn after(form: &mut Form<Self>) {
        if let Some(payload) = form.validated_mut() {
            if let Some(slug) = payload.get("slug").and_then(|s| s.as_str()) {
                let slug = slug.trim().to_lowercase().replace(' ', "-");
                payload.insert("slug".to_string(), slug.into());
            }
        }
    }
}
