use kit_forms::validation::{self, Rules};
use kit_forms::{async_trait, Form, FormRequest};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct StorePostRules {
    #[serde(deserialize_with = "validation::trim")]
    #[validate(length(min = 1, max = 120))]
    pub title: String,

    #[validate(length(min = 1, max = 120))]
    pub slug: String,

    #[serde(
        default,
        deserialize_with = "validation::trim_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub summary: Option<String>,
}

pub struct StorePostRequest;

#[async_trait]
impl FormRequest for StorePostRequest {
    type Schema = StorePostRules;

    fn rules(_form: &Form<Self>) -> Rules<StorePostRules> {
        Rules::new()
    }

    async fn authorize(form: &Form<Self>) -> bool {
        form.header("x-user-id").is_some()
    }
}
