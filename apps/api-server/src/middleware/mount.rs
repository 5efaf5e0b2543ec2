//! Mount-root normalization - lets `/posts` reach the same routes as `/posts/`.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::uri::{PathAndQuery, Uri},
};
use std::future::{Ready, ready};
use std::rc::Rc;

/// Middleware that rewrites a request for the bare mount point (`/posts`,
/// `/posts?x=1`) to the mount root (`/posts/`, `/posts/?x=1`) before routing.
/// The query string is carried over untouched; every other path passes
/// through unchanged.
pub struct MountRoot {
    base_path: Rc<str>,
}

impl MountRoot {
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: Rc::from(base_path.into()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MountRoot
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = MountRootService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(MountRootService {
            service,
            base_path: self.base_path.clone(),
        }))
    }
}

pub struct MountRootService<S> {
    service: S,
    base_path: Rc<str>,
}

impl<S, B> Service<ServiceRequest> for MountRootService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        if let Some(uri) = mount_root_uri(req.uri(), &self.base_path) {
            tracing::trace!(from = %req.uri(), to = %uri, "Rewriting bare mount path");
            req.match_info_mut().get_mut().update(&uri);
            req.head_mut().uri = uri;
        }

        self.service.call(req)
    }
}

/// The rewritten URI when `uri` addresses the bare mount point, else `None`.
fn mount_root_uri(uri: &Uri, base_path: &str) -> Option<Uri> {
    if base_path.is_empty() || base_path == "/" || uri.path() != base_path {
        return None;
    }

    let path_and_query = match uri.query() {
        Some(query) => format!("{base_path}/?{query}"),
        None => format!("{base_path}/"),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewrite(uri: &str) -> Option<String> {
        let uri: Uri = uri.parse().unwrap();
        mount_root_uri(&uri, "/posts").map(|u| u.to_string())
    }

    #[test]
    fn test_bare_mount_gets_trailing_slash() {
        assert_eq!(rewrite("/posts").as_deref(), Some("/posts/"));
    }

    #[test]
    fn test_query_is_preserved() {
        assert_eq!(
            rewrite("/posts?orderBy=created&x=1").as_deref(),
            Some("/posts/?orderBy=created&x=1")
        );
    }

    #[test]
    fn test_other_paths_untouched() {
        assert_eq!(rewrite("/posts/"), None);
        assert_eq!(rewrite("/posts/-Nabc"), None);
        assert_eq!(rewrite("/postsx"), None);
        assert_eq!(rewrite("/health"), None);
    }

    #[test]
    fn test_root_mount_never_rewrites() {
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(mount_root_uri(&uri, "/"), None);
    }
}
