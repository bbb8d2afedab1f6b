//! HTTP server
//!
//! Static files are served by explicit routes; everything else goes through
//! [`dispatch`], which runs the route matcher and picks a handler by action.

mod auth;
mod form;
mod pages;
mod proxy;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, State},
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::content::{AssetStore, MarkdownRenderer, PageStore};
use crate::credentials::CredentialStore;
use crate::routing::{match_route, Action};
use crate::service::{Feature, ServiceClient};
use crate::templates::TemplateRenderer;
use crate::Wiki;

/// Characters escaped in redirect locations; `/` stays literal
const PATH_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Shared handler state
pub struct AppState {
    pub pages: PageStore,
    pub assets: AssetStore,
    pub credentials: CredentialStore,
    pub markdown: MarkdownRenderer,
    pub templates: TemplateRenderer,
    pub service: ServiceClient,
}

impl AppState {
    pub fn new(wiki: &Wiki) -> crate::error::Result<Self> {
        Ok(Self {
            pages: wiki.page_store(),
            assets: wiki.asset_store(),
            credentials: wiki.credential_store(),
            markdown: wiki.markdown_renderer(),
            templates: TemplateRenderer::new()?,
            service: ServiceClient::new(&wiki.config.service_url, wiki.config.service_timeout())?,
        })
    }
}

/// Build the application router
pub fn router(wiki: &Wiki, state: Arc<AppState>) -> Router {
    Router::new()
        .nest_service("/uploads", ServeDir::new(&wiki.upload_dir))
        .nest_service("/images", ServeDir::new(&wiki.image_dir))
        .route_service("/templates/view.css", ServeFile::new(&wiki.stylesheet))
        .fallback(dispatch)
        .with_state(state)
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
}

/// Start the wiki server
pub async fn start(wiki: &Wiki, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(wiki)?);
    let app = router(wiki, state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    tracing::info!("Pages directory: {:?}", wiki.pages_dir);
    tracing::info!("Feature service: {}", wiki.config.service_url);
    println!("Wiki running at http://{}:{}/view/", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Route a dynamic request to its handler
pub async fn dispatch(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let Some(route) = match_route(request.uri().path()) else {
        tracing::debug!("No route for {}", request.uri().path());
        return (StatusCode::NOT_FOUND, "404 page not found").into_response();
    };

    let title = route.title.as_str();
    let result = match route.action {
        Action::View => pages::view(&state, title).await,
        Action::Edit => pages::edit(&state, title).await,
        Action::Save => pages::save(&state, title, request).await,
        Action::Delete => pages::delete(&state, title).await,
        Action::Create => pages::create(&state, request).await,
        Action::Upload => pages::upload(&state, title, request).await,
        Action::Rmsd => proxy::feature(&state, Feature::Rmsd, request).await,
        Action::Review => proxy::feature(&state, Feature::Review, request).await,
        Action::Movie => proxy::feature(&state, Feature::Movie, request).await,
        Action::Signup => auth::sign(&state, auth::SignKind::Signup, request).await,
        Action::Signin => auth::sign(&state, auth::SignKind::Signin, request).await,
        Action::Register => auth::register(&state, request).await,
    };

    result.unwrap_or_else(|e| e.into_response())
}

/// 302 redirect to a local path
fn redirect(path: &str) -> Response {
    let location = utf8_percent_encode(path, PATH_ESCAPE).to_string();
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Render a template into an HTML response
fn render<T: serde::Serialize>(
    state: &AppState,
    template: &str,
    data: &T,
) -> crate::error::Result<Response> {
    Ok(Html(state.templates.render(template, data)?).into_response())
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[tokio::test]
    async fn test_unmatched_paths_are_not_found() {
        let (_dir, wiki) = wiki("http://127.0.0.1:9");
        let state = state(&wiki);

        let paths = [
            "/",
            "/view/../etc",
            "/history/Home",
            "/view/a-b",
            "/viewHome",
            "/editHome",
            "/uploadsfoo",
        ];
        for path in paths {
            let response = send(&state, get(path)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", path);
        }
    }

    #[test]
    fn test_redirect_escapes_location() {
        let response = redirect("/edit/my page");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(location(&response), "/edit/my%20page");

        let response = redirect("/edit/café");
        assert_eq!(location(&response), "/edit/caf%C3%A9");
    }

    #[tokio::test]
    async fn test_router_serves_static_files() {
        let (dir, wiki) = wiki("http://127.0.0.1:9");
        std::fs::create_dir_all(dir.path().join("templates")).unwrap();
        std::fs::write(dir.path().join("templates/view.css"), "body {}").unwrap();
        wiki.asset_store().store("Cat", b"not really a png").unwrap();

        let app = router(&wiki, state(&wiki));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let css = reqwest::get(format!("http://{}/templates/view.css", addr))
            .await
            .unwrap();
        assert_eq!(css.status(), reqwest::StatusCode::OK);
        assert_eq!(css.text().await.unwrap(), "body {}");

        let image = reqwest::get(format!("http://{}/uploads/Cat.png", addr))
            .await
            .unwrap();
        assert_eq!(image.bytes().await.unwrap().as_ref(), b"not really a png");

        let missing = reqwest::get(format!("http://{}/images/none.png", addr))
            .await
            .unwrap();
        assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
