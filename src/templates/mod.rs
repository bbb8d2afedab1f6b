//! Built-in wiki templates using the Tera template engine
//!
//! Templates are embedded in the binary; `.html` names are autoescaped, so
//! rendered page bodies are marked `safe` where they are emitted.

use serde::Serialize;
use tera::{Context, Tera};

use crate::content::Page;
use crate::error::Result;

/// Template renderer with the embedded wiki theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all wiki templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("wiki/layout.html")),
            ("view.html", include_str!("wiki/view.html")),
            ("edit.html", include_str!("wiki/edit.html")),
            ("pages.html", include_str!("wiki/pages.html")),
            ("rmsd.html", include_str!("wiki/rmsd.html")),
            ("review.html", include_str!("wiki/review.html")),
            ("movie.html", include_str!("wiki/movie.html")),
            ("signup.html", include_str!("wiki/signup.html")),
            ("signin.html", include_str!("wiki/signin.html")),
            ("partials/nav.html", include_str!("wiki/partials/nav.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template against any serializable data
    pub fn render<T: Serialize>(&self, template_name: &str, data: &T) -> Result<String> {
        let context = Context::from_serialize(data)?;
        Ok(self.tera.render(template_name, &context)?)
    }

    /// Render a template that needs no data
    pub fn render_static(&self, template_name: &str) -> Result<String> {
        Ok(self.tera.render(template_name, &Context::new())?)
    }
}

// Data structures for template context

/// A rendered page as shown by `view.html`
#[derive(Debug, Clone, Serialize)]
pub struct ViewData {
    /// Title as it appears in the request path, used for links
    pub title: String,
    /// Sanitized title naming the stored image
    pub image_name: String,
    pub body: String,
    /// Every saved title, not only recent ones
    pub recent_pages: Vec<String>,
    pub image_exists: bool,
}

/// The edit form
#[derive(Debug, Clone, Serialize)]
pub struct EditData {
    /// Title as it appears in the request path; the form posts back to it
    pub title: String,
    pub markdown: String,
    pub image_exists: bool,
}

impl EditData {
    pub fn new(title: &str, page: &Page, image_exists: bool) -> Self {
        Self {
            title: title.to_string(),
            markdown: page.markdown_text().into_owned(),
            image_exists,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListData {
    pub pages: Vec<String>,
}

/// Feature forms with their (possibly empty) result line
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultData {
    pub result: String,
}
