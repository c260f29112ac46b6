use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use feed_logging::{feed_debug, feed_trace};
use headless_chrome::protocol::cdp::DOM::NodeId;
use headless_chrome::{Element, Tab};
use serde_json::json;

use crate::{NodeHandle, RenderSurface, SurfaceError, SurfaceResult};

/// Scrolls the nearest scrollable ancestor of the anchor (or the window).
const SCROLL_FROM_ANCHOR_JS: &str = r#"function(dx, dy) {
    let el = this;
    while (el && el !== document.body && el.scrollHeight <= el.clientHeight) {
        el = el.parentElement;
    }
    if (el && el !== document.body) {
        el.scrollBy(dx, dy);
    } else {
        window.scrollBy(dx, dy);
    }
}"#;

/// [`RenderSurface`] backed by a live Chrome tab.
///
/// Lookups run `querySelectorAll` against the current document node, so a
/// selector that matches nothing yields an empty result instead of an error.
/// The document node is cached until the next click, which is the only
/// operation that is expected to replace the document.
pub struct ChromeSurface {
    tab: Arc<Tab>,
    document: Cell<Option<NodeId>>,
}

impl ChromeSurface {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self {
            tab,
            document: Cell::new(None),
        }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn document_node(&self, refresh: bool) -> SurfaceResult<NodeId> {
        if !refresh {
            if let Some(id) = self.document.get() {
                return Ok(id);
            }
        }
        let node = self
            .tab
            .get_document()
            .map_err(|err| SurfaceError::Unavailable(err.to_string()))?;
        self.document.set(Some(node.node_id));
        Ok(node.node_id)
    }

    fn query_all_on(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, String> {
        self.tab
            .run_query_selector_all_on_node(scope, selector)
            .map(|elements| elements.iter().map(|el| el.node_id).collect())
            .map_err(|err| err.to_string())
    }

    fn query_document(&self, selector: &str) -> SurfaceResult<Vec<NodeHandle>> {
        let root = self.document_node(false)?;
        let ids = match self.query_all_on(root, selector) {
            Ok(ids) => ids,
            Err(err) => {
                // The cached document may have been replaced by client-side navigation.
                feed_trace!("query on cached document failed ({}), refreshing", err);
                let root = self.document_node(true)?;
                self.query_all_on(root, selector)
                    .map_err(SurfaceError::Unavailable)?
            }
        };
        Ok(ids.into_iter().map(|id| NodeHandle::new(u64::from(id))).collect())
    }

    fn element(&self, node: NodeHandle) -> SurfaceResult<Element<'_>> {
        let id = NodeId::try_from(node.raw()).map_err(|_| SurfaceError::Detached(node))?;
        Element::new(&self.tab, id).map_err(|err| self.node_error(node, err))
    }

    /// Tells a stale node apart from a dead session by probing the runtime.
    fn node_error(&self, node: NodeHandle, err: impl fmt::Display) -> SurfaceError {
        match self.tab.evaluate("1", false) {
            Ok(_) => {
                feed_debug!("node {} unreadable: {}", node, err);
                SurfaceError::Detached(node)
            }
            Err(probe) => {
                SurfaceError::Unavailable(format!("{err}; session probe failed: {probe}"))
            }
        }
    }
}

impl RenderSurface for ChromeSurface {
    fn find_one(&self, selector: &str) -> SurfaceResult<Option<NodeHandle>> {
        Ok(self.query_document(selector)?.into_iter().next())
    }

    fn find_all(&self, selector: &str) -> SurfaceResult<Vec<NodeHandle>> {
        self.query_document(selector)
    }

    fn find_within(&self, scope: NodeHandle, selector: &str) -> SurfaceResult<Option<NodeHandle>> {
        let id = NodeId::try_from(scope.raw()).map_err(|_| SurfaceError::Detached(scope))?;
        match self.query_all_on(id, selector) {
            Ok(ids) => Ok(ids.first().map(|id| NodeHandle::new(u64::from(*id)))),
            Err(err) => Err(self.node_error(scope, err)),
        }
    }

    fn text(&self, node: NodeHandle) -> SurfaceResult<String> {
        self.element(node)?
            .get_inner_text()
            .map_err(|err| self.node_error(node, err))
    }

    fn attribute(&self, node: NodeHandle, name: &str) -> SurfaceResult<Option<String>> {
        self.element(node)?
            .get_attribute_value(name)
            .map_err(|err| self.node_error(node, err))
    }

    fn click(&self, node: NodeHandle) -> SurfaceResult<()> {
        self.element(node)?
            .click()
            .map_err(|err| self.node_error(node, err))?;
        self.document.set(None);
        Ok(())
    }

    fn scroll_from_anchor(&self, anchor: NodeHandle, dx: i64, dy: i64) -> SurfaceResult<()> {
        self.element(anchor)?
            .call_js_fn(SCROLL_FROM_ANCHOR_JS, vec![json!(dx), json!(dy)], false)
            .map_err(|err| self.node_error(anchor, err))?;
        Ok(())
    }

    fn wait(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    fn current_url(&self) -> Option<String> {
        Some(self.tab.get_url())
    }
}
