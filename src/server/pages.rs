//! Page handlers: view, edit, save, delete, create, upload

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
};

use super::{form, redirect, render, AppState};
use crate::content::{sanitize_title, Page};
use crate::error::{Result, WikiError};
use crate::templates::{EditData, ListData, ViewData};

/// Show a page, or the list of all pages for an empty title.
/// Missing pages redirect to their edit form.
pub async fn view(state: &AppState, title: &str) -> Result<Response> {
    if title.is_empty() {
        let pages = state.pages.list()?;
        return render(state, "pages.html", &ListData { pages });
    }

    let page = match state.pages.load(title) {
        Ok(page) => page,
        Err(WikiError::PageNotFound(_)) => return Ok(redirect(&format!("/edit/{}", title))),
        Err(e) => return Err(e),
    };

    // Links keep the path title; the stored name only addresses the image
    let data = ViewData {
        title: title.to_string(),
        body: state.markdown.render_bytes(&page.body),
        recent_pages: state.pages.list()?,
        image_exists: state.assets.exists(&page.title),
        image_name: page.title,
    };
    render(state, "view.html", &data)
}

/// Edit form, blank when the page does not exist yet
pub async fn edit(state: &AppState, title: &str) -> Result<Response> {
    if title.is_empty() {
        return Err(WikiError::EmptyTitle);
    }

    let page = match state.pages.load(title) {
        Ok(page) => page,
        Err(WikiError::PageNotFound(title)) => Page::new(title),
        Err(e) => return Err(e),
    };
    let image_exists = state.assets.exists(&page.title);
    render(state, "edit.html", &EditData::new(title, &page, image_exists))
}

/// Render and persist the submitted body, plus the image if one was attached
pub async fn save(state: &AppState, title: &str, request: Request<Body>) -> Result<Response> {
    if title.is_empty() {
        return Err(WikiError::EmptyTitle);
    }

    let form = form::read(request).await?;
    let markdown = form.value("body");
    let body = state.markdown.render(markdown);

    let page = Page::with_content(sanitize_title(title), markdown, body);
    state.pages.save(&page)?;
    tracing::info!("Saved page {}", page.title);

    if let Some(image) = &form.upload {
        state.assets.store(title, image)?;
    }

    Ok(redirect(&format!("/view/{}", title)))
}

/// Remove a page record; its image is left in place
pub async fn delete(state: &AppState, title: &str) -> Result<Response> {
    if title.is_empty() {
        return Err(WikiError::EmptyTitle);
    }

    state.pages.delete(title)?;
    tracing::info!("Deleted page {}", sanitize_title(title));
    Ok(redirect("/view/"))
}

/// Validate a new title and hand over to the edit form.
/// Nothing is written until the first save.
pub async fn create(state: &AppState, request: Request<Body>) -> Result<Response> {
    let form = form::read(request).await?;
    let title = form.value("title");

    if title.is_empty() {
        return Err(WikiError::EmptyTitle);
    }
    if state.pages.exists(title) {
        return Err(WikiError::PageExists(sanitize_title(title)));
    }

    Ok(redirect(&format!("/edit/{}", title)))
}

/// Store an image for a page, whether or not the page exists
pub async fn upload(state: &AppState, title: &str, request: Request<Body>) -> Result<Response> {
    if request.method() != Method::POST {
        return Err(WikiError::MethodNotAllowed);
    }

    let form = form::read(request).await?;
    let image = form.upload.as_ref().ok_or(WikiError::MissingUpload)?;

    let title = if title.is_empty() {
        form.value("title")
    } else {
        title
    };
    if title.is_empty() {
        return Err(WikiError::EmptyTitle);
    }

    state.assets.store(title, image)?;
    tracing::info!("Stored image for {}", sanitize_title(title));
    Ok(redirect(&format!("/edit/{}", title)))
}
