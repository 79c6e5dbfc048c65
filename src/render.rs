//! Seam to the external diagram renderer.
//!
//! The renderer itself lives outside this crate. What lives here is the state
//! a caller keeps around it: a one-time initialization guard and the diagram
//! identifier, which changes whenever the text changes so the renderer never
//! sees one identifier with two different definitions.

use parking_lot::Mutex;
use thiserror::Error;
use tracing::debug;

/// Failure reported by the renderer. The message is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub trait DiagramRenderer {
    type Output;

    /// One-time setup. Called at most once successfully per session.
    fn initialize(&self) -> Result<(), RenderError>;

    fn render(&self, diagram_id: &str, text: &str) -> Result<Self::Output, RenderError>;
}

/// Hands out `gantt-<n>` identifiers, reusing the current one while the text
/// is unchanged.
#[derive(Debug, Clone)]
pub struct DiagramIds {
    prefix: String,
    next: u64,
    current: Option<(String, String)>,
}

impl Default for DiagramIds {
    fn default() -> Self {
        Self::with_prefix("gantt")
    }
}

impl DiagramIds {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
            current: None,
        }
    }

    pub fn id_for(&mut self, text: &str) -> String {
        if let Some((id, previous)) = &self.current {
            if previous == text {
                return id.clone();
            }
        }
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        self.current = Some((id.clone(), text.to_string()));
        id
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|(id, _)| id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDiagram<T> {
    pub diagram_id: String,
    pub output: T,
}

pub struct RenderSession<R> {
    renderer: R,
    initialized: Mutex<bool>,
    ids: Mutex<DiagramIds>,
}

impl<R: DiagramRenderer> RenderSession<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            initialized: Mutex::new(false),
            ids: Mutex::new(DiagramIds::default()),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn is_initialized(&self) -> bool {
        *self.initialized.lock()
    }

    /// Initialize the renderer unless an earlier call already succeeded.
    /// A failed attempt leaves the session uninitialized so the next call
    /// tries again.
    pub fn ensure_initialized(&self) -> Result<(), RenderError> {
        let mut initialized = self.initialized.lock();
        if !*initialized {
            self.renderer.initialize()?;
            *initialized = true;
            debug!("diagram renderer initialized");
        }
        Ok(())
    }

    pub fn render(&self, text: &str) -> Result<RenderedDiagram<R::Output>, RenderError> {
        self.ensure_initialized()?;
        let diagram_id = self.ids.lock().id_for(text);
        let output = self.renderer.render(&diagram_id, text)?;
        Ok(RenderedDiagram { diagram_id, output })
    }
}
