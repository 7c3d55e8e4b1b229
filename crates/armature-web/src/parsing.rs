//! Parsing of rendered markup into comparable fragments

use std::sync::Arc;

use thiserror::Error;

use crate::diffing::HtmlComparer;
use crate::rendering::{ComponentId, TestRenderer};

/// Errors from parsing rendered component markup
#[derive(Error, Debug)]
pub enum HtmlParseError {
    #[error("No rendered markup available for component {component}")]
    ComponentNotRendered { component: ComponentId },
}

/// Turns markup into [`MarkupFragment`]s bound to this parser's comparer
///
/// Holds the renderer it reads component markup from and the comparer its
/// fragments judge equality with. Both are shared, so fragments parsed
/// here compare exactly like the rest of the test context.
pub struct HtmlParser {
    renderer: Arc<dyn TestRenderer>,
    comparer: Arc<HtmlComparer>,
}

impl HtmlParser {
    pub fn new(renderer: Arc<dyn TestRenderer>, comparer: Arc<HtmlComparer>) -> Self {
        Self { renderer, comparer }
    }

    /// Wrap raw markup for comparison through this parser's comparer
    pub fn parse(&self, markup: &str) -> MarkupFragment {
        MarkupFragment {
            markup: markup.to_string(),
            comparer: Arc::clone(&self.comparer),
        }
    }

    /// Parse the latest rendered markup of a component
    pub fn parse_component(&self, component: ComponentId) -> Result<MarkupFragment, HtmlParseError> {
        let markup = self
            .renderer
            .rendered_markup(component)
            .ok_or(HtmlParseError::ComponentNotRendered { component })?;
        Ok(self.parse(&markup))
    }

    /// The renderer this parser reads from
    pub fn renderer(&self) -> Arc<dyn TestRenderer> {
        Arc::clone(&self.renderer)
    }

    /// The comparer this parser's fragments judge equality with
    pub fn comparer(&self) -> Arc<HtmlComparer> {
        Arc::clone(&self.comparer)
    }
}

/// A piece of markup bound to the comparer that judges its equality
#[derive(Debug, Clone)]
pub struct MarkupFragment {
    markup: String,
    comparer: Arc<HtmlComparer>,
}

impl MarkupFragment {
    /// The raw markup, exactly as parsed
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Whether this fragment matches `expected` modulo insignificant
    /// whitespace
    pub fn matches(&self, expected: &str) -> bool {
        self.comparer.markup_equals(expected, &self.markup)
    }
}
