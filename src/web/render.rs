//! HTML rendering of the release page

use handlebars::Handlebars;
use thiserror::Error;

use crate::cache::ReleaseView;

const INDEX_TEMPLATE_NAME: &str = "index";
const INDEX_TEMPLATE: &str = include_str!("../../templates/index.hbs");

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),
}

/// Renders [`ReleaseView`]s with the embedded page template
pub struct PageRenderer {
    registry: Handlebars<'static>,
}

impl PageRenderer {
    pub fn new() -> Result<Self, PageError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(INDEX_TEMPLATE_NAME, INDEX_TEMPLATE)?;
        Ok(Self { registry })
    }

    pub fn render(&self, view: &ReleaseView) -> Result<String, PageError> {
        Ok(self.registry.render(INDEX_TEMPLATE_NAME, view)?)
    }
}
