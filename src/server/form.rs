//! Form decoding for urlencoded and multipart submissions

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, Multipart, Query},
    http::{header, Request},
    Form,
};
use std::collections::HashMap;

use crate::error::{Result, WikiError};

/// Name of the file part carrying a page image
pub const UPLOAD_FIELD: &str = "uploadfile";

/// Submitted form values plus the optional uploaded image
#[derive(Debug, Default)]
pub struct FormData {
    pub fields: HashMap<String, String>,
    pub upload: Option<Bytes>,
}

impl FormData {
    /// Value of a field, empty when absent
    pub fn value(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// How the submitted values are carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Encoding {
    Multipart,
    Urlencoded,
    /// Anything else, including no body at all: only the query string counts
    QueryOnly,
}

fn encoding(request: &Request<Body>) -> Encoding {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if content_type.starts_with("multipart/form-data") {
        Encoding::Multipart
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        Encoding::Urlencoded
    } else {
        Encoding::QueryOnly
    }
}

/// Read the form fields of a request.
///
/// Urlencoded bodies go through `Form`; multipart bodies are walked part by
/// part. Any other body is ignored and the query string (possibly empty)
/// supplies the fields, so a bare POST reads as an empty form. A file part
/// only counts as an upload when the browser sent a file name with it.
pub async fn read(request: Request<Body>) -> Result<FormData> {
    match encoding(&request) {
        Encoding::Urlencoded => {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
                .await
                .map_err(|e| WikiError::Form(e.body_text()))?;
            return Ok(FormData {
                fields,
                upload: None,
            });
        }
        Encoding::QueryOnly => {
            let Query(fields) = Query::<HashMap<String, String>>::try_from_uri(request.uri())
                .map_err(|e| WikiError::Form(e.body_text()))?;
            return Ok(FormData {
                fields,
                upload: None,
            });
        }
        Encoding::Multipart => {}
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| WikiError::Form(e.body_text()))?;

    let mut form = FormData::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WikiError::Form(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let has_file = field.file_name().map(|f| !f.is_empty()).unwrap_or(false);

        if name == UPLOAD_FIELD && has_file {
            let data = field
                .bytes()
                .await
                .map_err(|e| WikiError::Form(e.body_text()))?;
            form.upload = Some(data);
        } else if !has_file {
            let value = field
                .text()
                .await
                .map_err(|e| WikiError::Form(e.body_text()))?;
            form.fields.entry(name).or_insert(value);
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{post_form, post_multipart};
    use super::*;

    #[tokio::test]
    async fn test_read_urlencoded() {
        let form = read(post_form("/create", "title=Home&extra=1")).await.unwrap();
        assert_eq!(form.value("title"), "Home");
        assert_eq!(form.value("missing"), "");
        assert!(form.upload.is_none());
    }

    #[tokio::test]
    async fn test_read_query_string_on_get() {
        let request = Request::get("/create?title=Query").body(Body::empty()).unwrap();
        let form = read(request).await.unwrap();
        assert_eq!(form.value("title"), "Query");
    }

    #[tokio::test]
    async fn test_read_post_without_content_type() {
        let request = Request::post("/register").body(Body::empty()).unwrap();
        let form = read(request).await.unwrap();
        assert!(form.fields.is_empty());
        assert!(form.upload.is_none());

        let request = Request::post("/create?title=Query")
            .body(Body::from("ignored"))
            .unwrap();
        let form = read(request).await.unwrap();
        assert_eq!(form.value("title"), "Query");
    }

    #[tokio::test]
    async fn test_read_other_content_type_ignores_body() {
        let request = Request::post("/save/Home")
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("body=text"))
            .unwrap();
        let form = read(request).await.unwrap();
        assert_eq!(form.value("body"), "");
    }

    #[tokio::test]
    async fn test_read_multipart_with_file() {
        let request = post_multipart("/save/Home", &[("body", "# Hi")], Some(b"\x89PNG"));
        let form = read(request).await.unwrap();
        assert_eq!(form.value("body"), "# Hi");
        assert_eq!(form.upload.as_deref(), Some(&b"\x89PNG"[..]));
    }

    #[tokio::test]
    async fn test_read_multipart_without_file() {
        let request = post_multipart("/save/Home", &[("body", "text")], None);
        let form = read(request).await.unwrap();
        assert_eq!(form.value("body"), "text");
        assert!(form.upload.is_none());
    }
}
