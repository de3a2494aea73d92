use kit_forms::{handler, json, Form, FrameworkError, Request, Response};
use serde_json::json;

use crate::models::Post;
use crate::requests::{StorePostRequest, UpdatePostRequest};

fn bound_post(req: &Request) -> Result<&Post, FrameworkError> {
    req.resource::<Post>("post")
        .ok_or_else(|| FrameworkError::internal("post binding missing"))
}

#[handler]
pub async fn show(req: Request) -> Response {
    let post = bound_post(&req)?;
    json(json!({ "post": post }))
}

#[handler]
pub async fn update(form: Form<UpdatePostRequest>) -> Response {
    let post = bound_post(&form)?;
    let id = post.id;

    tracing::info!(post = id, "post updated");
    json(json!({
        "post": form.safe().merge([("id".to_string(), json!(id))])
    }))
}

#[handler]
pub async fn store(form: Form<StorePostRequest>) -> Response {
    let rules = form.typed()?;

    tracing::info!(slug = %rules.slug, "post created");
    Ok(kit_forms::HttpResponse::json(json!({
        "post": form.safe().all()
    }))
    .status(201))
}
