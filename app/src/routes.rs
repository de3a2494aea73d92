use kit_forms::Router;

use crate::controllers::posts;
use crate::models::Post;

pub fn router() -> Router {
    Router::new()
        .get("/posts/{post}", posts::show)
        .bind::<Post>("post")
        .put("/posts/{post}", posts::update)
        .bind::<Post>("post")
        .post("/posts", posts::store)
        .into()
}
