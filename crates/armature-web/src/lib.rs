//! Default web services for Armature test contexts
//!
//! Bootstraps the services a web component test needs before its first
//! assertion: a JavaScript interop placeholder, a whitespace-insensitive
//! markup comparer, and a markup parser wired to whichever renderer the
//! test registers. Everything lives in an [`armature_di::ServiceRegistry`],
//! so tests override any default by registering their own binding on top.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use armature_web::{ComponentId, HtmlParser, TestContext, TestRenderer};
//!
//! struct StaticRenderer;
//!
//! impl TestRenderer for StaticRenderer {
//!     fn rendered_markup(&self, _component: ComponentId) -> Option<String> {
//!         Some("<p>Hello</p>".to_string())
//!     }
//! }
//!
//! let ctx = TestContext::new();
//! ctx.services()
//!     .register_instance::<dyn TestRenderer>(Arc::new(StaticRenderer));
//!
//! let parser = ctx.services().resolve::<HtmlParser>().unwrap();
//! let fragment = parser.parse_component(ComponentId(1)).unwrap();
//! assert!(fragment.matches("<p>\n    Hello\n</p>"));
//! ```

pub mod context;
pub mod diffing;
pub mod extensions;
pub mod js_interop;
pub mod parsing;
pub mod rendering;

pub use context::TestContext;
pub use diffing::HtmlComparer;
pub use extensions::{add_default_test_context_services, TestContextServicesExt};
pub use js_interop::{JsRuntime, JsRuntimeError, JsRuntimeExt, PlaceholderJsRuntime};
pub use parsing::{HtmlParseError, HtmlParser, MarkupFragment};
pub use rendering::{ComponentId, TestRenderer};
