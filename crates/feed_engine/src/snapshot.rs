use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::{NodeHandle, RenderSurface, SurfaceError, SurfaceResult};

const DEFAULT_PAGE_ATTRIBUTE: &str = "data-page";

/// [`RenderSurface`] over saved HTML result pages.
///
/// Page 1 is rendered on construction. Clicking a node that carries the page
/// attribute (on itself or an ancestor) renders the page it names. A clicked
/// node without the attribute renders the next saved page, which is how plain
/// browser captures are replayed in order. A click that cannot change the
/// rendered page fails with [`SurfaceError::Detached`]. Handles resolved on
/// the previous page become detached. Scrolls and waits are counted instead
/// of performed.
pub struct SnapshotSurface {
    pages: Vec<Html>,
    current: Cell<usize>,
    page_attribute: String,
    base_url: Option<String>,
    nodes: RefCell<Vec<(usize, NodeId)>>,
    handles: RefCell<HashMap<(usize, NodeId), NodeHandle>>,
    scrolls: Cell<usize>,
    waited: Cell<Duration>,
}

impl SnapshotSurface {
    pub fn from_pages<I, S>(pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            pages: pages
                .into_iter()
                .map(|html| Html::parse_document(html.as_ref()))
                .collect(),
            current: Cell::new(0),
            page_attribute: DEFAULT_PAGE_ATTRIBUTE.to_string(),
            base_url: None,
            nodes: RefCell::new(Vec::new()),
            handles: RefCell::new(HashMap::new()),
            scrolls: Cell::new(0),
            waited: Cell::new(Duration::ZERO),
        }
    }

    pub fn with_page_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.page_attribute = attribute.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// 1-based index of the rendered page.
    pub fn current_page(&self) -> usize {
        self.current.get() + 1
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls.get()
    }

    pub fn total_waited(&self) -> Duration {
        self.waited.get()
    }

    fn document(&self) -> SurfaceResult<&Html> {
        self.pages
            .get(self.current.get())
            .ok_or_else(|| SurfaceError::Unavailable("snapshot has no pages".to_string()))
    }

    /// Number of distinct nodes handed out so far.
    pub fn registered_nodes(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Repeated lookups of the same node on the same page share one handle.
    fn register(&self, id: NodeId) -> NodeHandle {
        let key = (self.current.get(), id);
        *self.handles.borrow_mut().entry(key).or_insert_with(|| {
            let mut nodes = self.nodes.borrow_mut();
            nodes.push(key);
            NodeHandle::new((nodes.len() - 1) as u64)
        })
    }

    fn resolve(&self, handle: NodeHandle) -> SurfaceResult<ElementRef<'_>> {
        let entry = usize::try_from(handle.raw())
            .ok()
            .and_then(|index| self.nodes.borrow().get(index).copied());
        let (page, id) = match entry {
            Some((page, id)) if page == self.current.get() => (page, id),
            _ => return Err(SurfaceError::Detached(handle)),
        };
        self.pages[page]
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .ok_or(SurfaceError::Detached(handle))
    }

    /// 0-based index of the page a click on `element` renders, if any.
    fn target_page(&self, element: ElementRef<'_>) -> Option<usize> {
        let named = std::iter::once(element)
            .chain(element.ancestors().filter_map(ElementRef::wrap))
            .find_map(|el| el.value().attr(&self.page_attribute));
        let target = match named {
            Some(value) => value.trim().parse::<usize>().ok()?.checked_sub(1)?,
            None => self.current.get() + 1,
        };
        (target < self.pages.len() && target != self.current.get()).then_some(target)
    }
}

fn parse_selector(selector: &str) -> SurfaceResult<Selector> {
    Selector::parse(selector).map_err(|err| SurfaceError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

impl RenderSurface for SnapshotSurface {
    fn find_one(&self, selector: &str) -> SurfaceResult<Option<NodeHandle>> {
        let selector = parse_selector(selector)?;
        let found = self.document()?.select(&selector).next().map(|el| el.id());
        Ok(found.map(|id| self.register(id)))
    }

    fn find_all(&self, selector: &str) -> SurfaceResult<Vec<NodeHandle>> {
        let selector = parse_selector(selector)?;
        let ids: Vec<NodeId> = self.document()?.select(&selector).map(|el| el.id()).collect();
        Ok(ids.into_iter().map(|id| self.register(id)).collect())
    }

    fn find_within(&self, scope: NodeHandle, selector: &str) -> SurfaceResult<Option<NodeHandle>> {
        let selector = parse_selector(selector)?;
        let found = self.resolve(scope)?.select(&selector).next().map(|el| el.id());
        Ok(found.map(|id| self.register(id)))
    }

    fn text(&self, node: NodeHandle) -> SurfaceResult<String> {
        Ok(self.resolve(node)?.text().collect())
    }

    fn attribute(&self, node: NodeHandle, name: &str) -> SurfaceResult<Option<String>> {
        Ok(self.resolve(node)?.value().attr(name).map(ToOwned::to_owned))
    }

    fn click(&self, node: NodeHandle) -> SurfaceResult<()> {
        let element = self.resolve(node)?;
        let page = self
            .target_page(element)
            .ok_or(SurfaceError::Detached(node))?;
        self.current.set(page);
        Ok(())
    }

    fn scroll_from_anchor(&self, anchor: NodeHandle, _dx: i64, _dy: i64) -> SurfaceResult<()> {
        self.resolve(anchor)?;
        self.scrolls.set(self.scrolls.get() + 1);
        Ok(())
    }

    fn wait(&self, duration: Duration) {
        self.waited.set(self.waited.get() + duration);
    }

    fn current_url(&self) -> Option<String> {
        self.base_url.clone()
    }
}
