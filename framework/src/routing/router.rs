use super::binding::RouteBinding;
use crate::error::FrameworkError;
use crate::http::{HttpResponse, Request, Response};
use hyper::Method;
use matchit::Router as MatchitRouter;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

type BindFuture = Pin<Box<dyn Future<Output = Result<Request, FrameworkError>> + Send>>;

/// Resolves one route parameter and attaches the result as a resource
type BoxedBinder = Arc<dyn Fn(Request) -> BindFuture + Send + Sync>;

struct Route {
    handler: BoxedHandler,
    binders: Vec<BoxedBinder>,
}

/// HTTP Router with Laravel-like route registration
///
/// ```rust,ignore
/// Router::new()
///     .get("/posts/{post}", controllers::posts::show)
///     .put("/posts/{post}", controllers::posts::update)
///     .bind::<Post>("post")
/// ```
pub struct Router {
    routes: Vec<Route>,
    /// Per-method path index into `routes`
    methods: HashMap<Method, MatchitRouter<usize>>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            methods: HashMap::new(),
        }
    }

    fn insert<H, Fut>(mut self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        let index = self.routes.len();
        self.routes.push(Route {
            handler,
            binders: Vec::new(),
        });

        if let Err(err) = self
            .methods
            .entry(method.clone())
            .or_default()
            .insert(path, index)
        {
            tracing::warn!(%method, path, error = %err, "route was not registered");
        }

        RouteBuilder {
            router: self,
            last: index,
        }
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::GET, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::POST, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::PUT, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.insert(Method::DELETE, path, handler)
    }

    /// Match a method and path, returning the route index and extracted params
    fn match_route(&self, method: &Method, path: &str) -> Option<(usize, HashMap<String, String>)> {
        let matched = self.methods.get(method)?.at(path).ok()?;
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Some((*matched.value, params))
    }

    /// Dispatch a request to its route
    ///
    /// Route bindings run first, in registration order; the first failing
    /// binding answers the request. Unmatched requests get a 404.
    pub async fn handle(&self, req: Request) -> HttpResponse {
        let Some((index, params)) = self.match_route(req.method(), req.path()) else {
            tracing::debug!(method = %req.method(), path = req.path(), "no route matched");
            return HttpResponse::text("404 Not Found").status(404);
        };

        let route = &self.routes[index];
        let mut req = req.with_params(params);

        for binder in &route.binders {
            req = match binder(req).await {
                Ok(req) => req,
                Err(err) => return err.into(),
            };
        }

        match (route.handler)(req).await {
            Ok(response) | Err(response) => response,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder returned after registering a route, enabling `.bind()` chaining
pub struct RouteBuilder {
    router: Router,
    last: usize,
}

impl RouteBuilder {
    /// Resolve route parameter `param` into a `T` before the action runs
    ///
    /// The value is attached to the request as a resource named `param`.
    pub fn bind<T: RouteBinding>(mut self, param: &str) -> RouteBuilder {
        let param = param.to_string();
        let binder: BoxedBinder = Arc::new(move |req: Request| {
            let param = param.clone();
            let bound: BindFuture = Box::pin(async move {
                let value = req.param(&param)?.to_string();
                let resolved = T::from_route_param(&value).await?;
                Ok::<_, FrameworkError>(req.with_resource(param, resolved))
            });
            bound
        });

        if let Some(route) = self.router.routes.get_mut(self.last) {
            route.binders.push(binder);
        }
        self
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.put(path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.delete(path, handler)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}
