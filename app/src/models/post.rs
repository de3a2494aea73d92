use kit_forms::{async_trait, FrameworkError, RouteBinding};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: u64,
    pub author_id: u64,
    pub title: String,
    pub slug: String,
}

impl Post {
    /// Seed data standing in for a database table
    pub fn find(id: u64) -> Option<Post> {
        let posts = [
            (1, 10, "Hello world", "hello-world"),
            (2, 20, "Second post", "second-post"),
        ];

        posts
            .into_iter()
            .find(|(post_id, ..)| *post_id == id)
            .map(|(id, author_id, title, slug)| Post {
                id,
                author_id,
                title: title.to_string(),
                slug: slug.to_string(),
            })
    }
}

#[async_trait]
impl RouteBinding for Post {
    async fn from_route_param(value: &str) -> Result<Self, FrameworkError> {
        let id: u64 = value
            .parse()
            .map_err(|_| FrameworkError::param_parse(value, "u64"))?;

        Post::find(id).ok_or_else(|| FrameworkError::model_not_found("Post"))
    }
}
