use std::sync::atomic::{AtomicUsize, Ordering};

use kit_forms::testing::{TestContainer, TestRequest};
use kit_forms::validation::{self, Rules};
use kit_forms::{
    async_trait, expect, handler, json, Deserialize, Form, FormRequest, FormRequestBinding,
    FormRequestConfig, FrameworkError, Request, Response, RouteBinding, Router, Serialize,
    Validate,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct PostRules {
    #[serde(deserialize_with = "validation::trim")]
    pub title: String,
    pub slug: String,
}

/// Form request whose authorization can be scripted per test
macro_rules! post_request {
    ($name:ident, authorize = $allowed:expr) => {
        pub struct $name;

        #[async_trait]
        impl FormRequest for $name {
            type Schema = PostRules;

            fn rules(_form: &Form<Self>) -> Rules<PostRules> {
                Rules::new()
            }

            async fn authorize(_form: &Form<Self>) -> bool {
                $allowed
            }
        }
    };
}

fn object(value: Value) -> kit_forms::Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {}", other),
    }
}

mod denied {
    use super::*;

    post_request!(DeniedPostRequest, authorize = false);

    pub static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[handler]
    pub async fn show(_form: Form<DeniedPostRequest>) -> Response {
        CALLS.fetch_add(1, Ordering::SeqCst);
        json(json!({}))
    }
}

#[tokio::test]
async fn unauthorized_request_is_forbidden_and_action_never_runs() {
    let router: Router = Router::new().get("/posts/{post}", denied::show).into();

    let response = TestRequest::get("/posts/1?title=Test&slug=test-slug")
        .send(&router)
        .await;

    expect!(response.clone()).to_have_status(403);
    expect!(response).to_have_empty_body();
    expect!(denied::CALLS.load(Ordering::SeqCst)).to_equal(0);
}

mod invalid {
    use super::*;

    post_request!(InvalidPostRequest, authorize = true);

    pub static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[handler]
    pub async fn show(_form: Form<InvalidPostRequest>) -> Response {
        CALLS.fetch_add(1, Ordering::SeqCst);
        json(json!({}))
    }
}

#[tokio::test]
async fn invalid_input_is_unprocessable_and_action_never_runs() {
    let router: Router = Router::new().get("/posts/{post}", invalid::show).into();

    let response = TestRequest::get("/posts/1").send(&router).await;

    expect!(response.clone()).to_have_status(422);
    expect!(response).to_have_json(json!({
        "message": "The given data was invalid.",
        "errors": {
            "slug": ["The slug field is required."],
            "title": ["The title field is required."]
        }
    }));
    expect!(invalid::CALLS.load(Ordering::SeqCst)).to_equal(0);
}

mod valid {
    use super::*;

    post_request!(ValidPostRequest, authorize = true);

    pub static CALLS: AtomicUsize = AtomicUsize::new(0);

    #[handler]
    pub async fn update(form: Form<ValidPostRequest>) -> Response {
        CALLS.fetch_add(1, Ordering::SeqCst);

        // Request members are reachable straight off the form
        let via_request: &Request = &form;
        json(json!({
            "validated": form.validated(),
            "path": via_request.path(),
            "query_title": form.query("title"),
        }))
    }
}

#[tokio::test]
async fn valid_request_runs_action_once_with_trimmed_payload() {
    let router: Router = Router::new().put("/posts/{post}", valid::update).into();

    let response = TestRequest::put("/posts/1?title=Test%20%20%20%20&slug=test-slug")
        .send(&router)
        .await;

    expect!(response.clone()).to_have_status(200);
    assert_eq!(valid::CALLS.load(Ordering::SeqCst), 1);
    assert_eq!(
        response.json_body().unwrap(),
        json!({
            "validated": { "title": "Test", "slug": "test-slug" },
            "path": "/posts/1",
            "query_title": "Test    ",
        })
    );
}

mod precedence {
    use super::*;

    post_request!(PrecedencePostRequest, authorize = true);

    #[handler]
    pub async fn update(form: Form<PrecedencePostRequest>) -> Response {
        json(json!({ "validated": form.validated() }))
    }
}

#[tokio::test]
async fn body_fields_win_over_query_fields() {
    let router: Router = Router::new().put("/posts/{post}", precedence::update).into();

    let response = TestRequest::put("/posts/1?title=Query&slug=from-query")
        .json(json!({ "title": "  Body  " }))
        .send(&router)
        .await;

    assert_eq!(
        response.json_body().unwrap()["validated"],
        json!({ "title": "Body", "slug": "from-query" })
    );
}

mod hooks {
    use super::*;

    pub static BEFORE_SAW_UNSET: AtomicUsize = AtomicUsize::new(0);
    pub static AFTER_SAW_SET: AtomicUsize = AtomicUsize::new(0);

    pub struct HookedPostRequest;

    #[async_trait]
    impl FormRequest for HookedPostRequest {
        type Schema = PostRules;

        fn rules(_form: &Form<Self>) -> Rules<PostRules> {
            Rules::new()
        }

        async fn before(form: &mut Form<Self>) {
            if form.validated().is_none() {
                BEFORE_SAW_UNSET.fetch_add(1, Ordering::SeqCst);
            }
        }

        async fn after(form: &mut Form<Self>) {
            if let Some(payload) = form.validated_mut() {
                AFTER_SAW_SET.fetch_add(1, Ordering::SeqCst);
                payload.insert("title".to_string(), json!("New title"));
            }
        }
    }

    #[handler]
    pub async fn update(form: Form<HookedPostRequest>) -> Response {
        json(json!({ "validated": form.validated() }))
    }
}

#[tokio::test]
async fn hooks_run_before_and_after_validation() {
    let router: Router = Router::new().put("/posts/{post}", hooks::update).into();

    let response = TestRequest::put("/posts/1?title=Test&slug=test-slug")
        .send(&router)
        .await;

    assert_eq!(hooks::BEFORE_SAW_UNSET.load(Ordering::SeqCst), 1);
    assert_eq!(hooks::AFTER_SAW_SET.load(Ordering::SeqCst), 1);
    assert_eq!(
        response.json_body().unwrap()["validated"],
        json!({ "title": "New title", "slug": "test-slug" })
    );
}

mod projections {
    use super::*;

    post_request!(SafePostRequest, authorize = true);

    #[handler]
    pub async fn update(form: Form<SafePostRequest>) -> Response {
        let safe = form.safe();
        json(json!({
            "all": safe.all(),
            "matches_validated": Some(safe.all()) == form.validated(),
            "only": safe.only(&["slug"]),
            "except": safe.except(&["slug"]),
            "merge": safe.merge([("foo".to_string(), json!("bar"))]),
        }))
    }
}

#[tokio::test]
async fn safe_input_projections() {
    let router: Router = Router::new().put("/posts/{post}", projections::update).into();

    let response = TestRequest::put("/posts/1?title=Test&slug=test-slug")
        .send(&router)
        .await;

    assert_eq!(
        response.json_body().unwrap(),
        json!({
            "all": { "title": "Test", "slug": "test-slug" },
            "matches_validated": true,
            "only": { "slug": "test-slug" },
            "except": { "title": "Test" },
            "merge": { "title": "Test", "slug": "test-slug", "foo": "bar" },
        })
    );
}

mod bound {
    use super::*;

    #[derive(Debug, Clone)]
    pub struct Post {
        pub id: u64,
        pub author_id: u64,
    }

    #[async_trait]
    impl RouteBinding for Post {
        async fn from_route_param(value: &str) -> Result<Self, FrameworkError> {
            let id: u64 = value
                .parse()
                .map_err(|_| FrameworkError::param_parse(value, "u64"))?;
            Ok(Post { id, author_id: 7 })
        }
    }

    pub struct OwnerPostRequest;

    #[async_trait]
    impl FormRequest for OwnerPostRequest {
        type Schema = PostRules;

        fn rules(_form: &Form<Self>) -> Rules<PostRules> {
            Rules::new()
        }

        async fn authorize(form: &Form<Self>) -> bool {
            let user = form.header("x-user-id").and_then(|v| v.parse::<u64>().ok());
            form.resource::<Post>("post")
                .zip(user)
                .is_some_and(|(post, user)| post.author_id == user)
        }
    }

    #[handler]
    pub async fn update(form: Form<OwnerPostRequest>) -> Response {
        let id = form.resource::<Post>("post").map(|p| p.id);
        json(json!({ "id": id }))
    }
}

#[tokio::test]
async fn route_resources_are_visible_on_the_form() {
    let router: Router = Router::new()
        .put("/posts/{post}", bound::update)
        .bind::<bound::Post>("post")
        .into();

    let allowed = TestRequest::put("/posts/3?title=Test&slug=test-slug")
        .header("x-user-id", "7")
        .send(&router)
        .await;
    let denied = TestRequest::put("/posts/3?title=Test&slug=test-slug")
        .header("x-user-id", "8")
        .send(&router)
        .await;
    let unparsable = TestRequest::put("/posts/abc").send(&router).await;

    assert_eq!(allowed.json_body().unwrap(), json!({ "id": 3 }));
    expect!(denied).to_have_status(403);
    expect!(unparsable).to_have_status(400);
}

mod ordered {
    use super::*;

    pub static SECOND_AUTHORIZED: AtomicUsize = AtomicUsize::new(0);

    post_request!(FirstDeniedRequest, authorize = false);

    pub struct SecondRequest;

    #[async_trait]
    impl FormRequest for SecondRequest {
        type Schema = PostRules;

        fn rules(_form: &Form<Self>) -> Rules<PostRules> {
            Rules::new()
        }

        async fn authorize(_form: &Form<Self>) -> bool {
            SECOND_AUTHORIZED.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    post_request!(AllowedRequest, authorize = true);

    #[handler]
    pub async fn denied_first(
        _first: Form<FirstDeniedRequest>,
        _second: Form<SecondRequest>,
    ) -> Response {
        json(json!({}))
    }

    #[handler]
    pub async fn both(
        req: Request,
        first: Form<AllowedRequest>,
        second: Form<SecondRequest>,
    ) -> Response {
        json(json!({
            "path": req.path(),
            "same_payload": first.validated() == second.validated(),
        }))
    }
}

#[tokio::test]
async fn parameters_are_processed_in_order_and_first_failure_aborts() {
    let router: Router = Router::new()
        .put("/denied/{post}", ordered::denied_first)
        .put("/both/{post}", ordered::both)
        .into();

    let denied = TestRequest::put("/denied/1?title=Test&slug=test-slug")
        .send(&router)
        .await;
    expect!(denied).to_have_status(403);
    assert_eq!(ordered::SECOND_AUTHORIZED.load(Ordering::SeqCst), 0);

    let both = TestRequest::put("/both/1?title=Test&slug=test-slug")
        .send(&router)
        .await;
    assert_eq!(
        both.json_body().unwrap(),
        json!({ "path": "/both/1", "same_payload": true })
    );
    assert_eq!(ordered::SECOND_AUTHORIZED.load(Ordering::SeqCst), 1);
}

mod configured {
    use super::*;

    post_request!(ConfiguredDeniedRequest, authorize = false);
    post_request!(ConfiguredAllowedRequest, authorize = true);

    #[handler]
    pub async fn denied(_form: Form<ConfiguredDeniedRequest>) -> Response {
        json(json!({}))
    }

    #[handler]
    pub async fn allowed(form: Form<ConfiguredAllowedRequest>) -> Response {
        json(json!({ "include_query": form.config().include_query }))
    }
}

#[tokio::test]
async fn registered_binding_configures_instances() {
    let _guard = TestContainer::fake();
    TestContainer::singleton(FormRequestBinding::new(
        FormRequestConfig::default()
            .include_query(false)
            .forbidden_message("This action is unauthorized."),
    ));

    let router: Router = Router::new()
        .put("/denied", configured::denied)
        .put("/allowed", configured::allowed)
        .into();

    let denied = TestRequest::put("/denied").send(&router).await;
    expect!(denied).to_have_json(json!({ "message": "This action is unauthorized." }));

    // Query is ignored, so only the body counts
    let from_query = TestRequest::put("/allowed?title=Test&slug=test-slug")
        .send(&router)
        .await;
    expect!(from_query).to_have_status(422);

    let from_body = TestRequest::put("/allowed")
        .form(&[("title", "Test"), ("slug", "test-slug")])
        .send(&router)
        .await;
    assert_eq!(
        from_body.json_body().unwrap(),
        json!({ "include_query": false })
    );
}

mod overridden {
    use super::*;

    pub struct OverrideRequest;

    #[async_trait]
    impl FormRequest for OverrideRequest {
        type Schema = PostRules;

        fn rules(form: &Form<Self>) -> Rules<PostRules> {
            let data = match form.param("post").ok() {
                Some(slug) => json!({ "title": " From data ", "slug": slug }),
                None => json!({ "title": " From data " }),
            };
            Rules::new().data(object(data)).message("required", "Needed.")
        }
    }
}

#[tokio::test]
async fn rules_data_replaces_request_input() {
    let req = TestRequest::put("/posts/abc?title=ignored").param("post", "abc").build();
    let mut form =
        Form::<overridden::OverrideRequest>::with_config(req, FormRequestConfig::default());
    form.validate_payload().await.unwrap();

    assert_eq!(
        form.validated().cloned(),
        Some(object(json!({ "title": "From data", "slug": "abc" })))
    );
}

#[tokio::test]
async fn rules_messages_apply_to_data_override() {
    // slug is present in the query but only the override is validated
    let req = TestRequest::put("/posts?slug=ignored").build();
    let mut form =
        Form::<overridden::OverrideRequest>::with_config(req, FormRequestConfig::default());

    match form.validate_payload().await {
        Err(FrameworkError::Validation(errors)) => {
            expect!(errors.has("slug")).to_be_true();
            expect!(errors.has("title")).to_be_false();
            assert_eq!(errors.get("slug"), Some(&["Needed.".to_string()][..]));
        }
        other => panic!("expected validation errors, got {:?}", other),
    }
    assert_eq!(form.validated(), None);
}
