#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use feed_engine::{
    FeedSelectors, NodeHandle, ProgressSink, RenderSurface, ScrapeEvent, SurfaceError,
    SurfaceResult, DEFAULT_PAGE_CONTROL, PAGE_PLACEHOLDER,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(feed_logging::initialize_for_tests);
}

#[derive(Debug, Clone, Default)]
pub struct FakeListing {
    pub title: Option<String>,
    pub location: Option<String>,
    pub employer: Option<String>,
    pub href: Option<String>,
}

impl FakeListing {
    pub fn full(page: usize, n: usize) -> Self {
        Self {
            title: Some(format!("Engineer {page}-{n}")),
            location: Some(format!("City {n}")),
            employer: Some(format!("Employer {n}")),
            href: Some(format!("https://jobs.example.com/view/{page}-{n}/?trk=feed")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindOne(String),
    FindAll(String),
    FindWithin(String),
    Text,
    Attribute,
    Click { page: usize },
    Scroll,
    Wait(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Sentinel = 1,
    Anchor,
    Container,
    Title,
    Link,
    Location,
    Employer,
    PageControl,
}

impl Kind {
    fn from_raw(raw: u64) -> Option<Self> {
        Some(match raw {
            1 => Kind::Sentinel,
            2 => Kind::Anchor,
            3 => Kind::Container,
            4 => Kind::Title,
            5 => Kind::Link,
            6 => Kind::Location,
            7 => Kind::Employer,
            8 => Kind::PageControl,
            _ => return None,
        })
    }
}

fn encode(kind: Kind, page: usize, index: usize) -> NodeHandle {
    NodeHandle::new(((page as u64) << 32) | ((index as u64) << 8) | kind as u64)
}

fn decode(node: NodeHandle) -> (Kind, usize, usize) {
    let raw = node.raw();
    let kind = Kind::from_raw(raw & 0xff).expect("handle created by the fake");
    (kind, (raw >> 32) as usize, ((raw >> 8) & 0xff_ffff) as usize)
}

/// In-memory results feed that records every call made against it.
pub struct ScriptedSurface {
    pages: Vec<Vec<FakeListing>>,
    no_results: bool,
    selectors: FeedSelectors,
    current: Cell<usize>,
    calls: RefCell<Vec<Call>>,
    failing_page: Option<(usize, SurfaceError)>,
    detached: Vec<(Kind, usize, usize)>,
    anchor: bool,
}

impl ScriptedSurface {
    pub fn new(pages: Vec<Vec<FakeListing>>) -> Self {
        Self {
            pages,
            no_results: false,
            selectors: FeedSelectors::default(),
            current: Cell::new(1),
            calls: RefCell::new(Vec::new()),
            failing_page: None,
            detached: Vec::new(),
            anchor: true,
        }
    }

    /// `pages` pages of `per_page` fully populated listings.
    pub fn uniform(pages: usize, per_page: usize) -> Self {
        Self::new(
            (1..=pages)
                .map(|page| (0..per_page).map(|n| FakeListing::full(page, n)).collect())
                .collect(),
        )
    }

    pub fn empty_search() -> Self {
        let mut surface = Self::new(Vec::new());
        surface.no_results = true;
        surface
    }

    /// Every read on `page` fails as if the browser went away.
    pub fn unavailable_on_page(mut self, page: usize) -> Self {
        let err = SurfaceError::Unavailable("browser closed".to_string());
        self.failing_page = Some((page, err));
        self
    }

    /// Every listing lookup on `page` races a re-render and comes back stale.
    pub fn stale_on_page(mut self, page: usize) -> Self {
        self.failing_page = Some((page, SurfaceError::Detached(NodeHandle::new(0))));
        self
    }

    /// The `kind` node of listing `index` on `page` unmounts between lookup
    /// and read. For page controls `index` is the page the control targets.
    pub fn detach(mut self, kind: Kind, page: usize, index: usize) -> Self {
        self.detached.push((kind, page, index));
        self
    }

    /// The results list has no scroll anchor.
    pub fn without_anchor(mut self) -> Self {
        self.anchor = false;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn current_page(&self) -> usize {
        self.current.get()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| pred(c)).count()
    }

    pub fn scrolls(&self) -> usize {
        self.count(|c| *c == Call::Scroll)
    }

    pub fn clicks(&self) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::Click { page } => Some(*page),
                _ => None,
            })
            .collect()
    }

    pub fn listing_reads(&self) -> usize {
        let listing = self.selectors.listing.clone();
        let title = self.selectors.title.clone();
        self.count(|c| matches!(c, Call::FindAll(s) if *s == listing || *s == title))
    }

    /// Page indexes whose controls were looked up.
    pub fn page_lookups(&self) -> Vec<usize> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::FindOne(s) => control_page(s),
                _ => None,
            })
            .collect()
    }

    fn listings(&self) -> &[FakeListing] {
        self.pages
            .get(self.current.get().wrapping_sub(1))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn check_available(&self) -> SurfaceResult<()> {
        match &self.failing_page {
            Some((page, err)) if *page == self.current.get() => Err(err.clone()),
            _ => Ok(()),
        }
    }

    fn live(&self, node: NodeHandle) -> SurfaceResult<(Kind, usize)> {
        let (kind, page, index) = decode(node);
        if page != self.current.get() || self.detached.contains(&(kind, page, index)) {
            return Err(SurfaceError::Detached(node));
        }
        Ok((kind, index))
    }

    fn field_kind(&self, selector: &str) -> Option<Kind> {
        let s = &self.selectors;
        if selector == s.title {
            Some(Kind::Title)
        } else if selector == s.link {
            Some(Kind::Link)
        } else if selector == s.location {
            Some(Kind::Location)
        } else if selector == s.employer {
            Some(Kind::Employer)
        } else {
            None
        }
    }

    fn has_field(listing: &FakeListing, kind: Kind) -> bool {
        match kind {
            Kind::Title => listing.title.is_some(),
            Kind::Link => listing.href.is_some(),
            Kind::Location => listing.location.is_some(),
            Kind::Employer => listing.employer.is_some(),
            _ => false,
        }
    }
}

fn control_page(selector: &str) -> Option<usize> {
    let (prefix, suffix) = DEFAULT_PAGE_CONTROL.split_once(PAGE_PLACEHOLDER)?;
    selector
        .strip_prefix(prefix)?
        .strip_suffix(suffix)?
        .parse()
        .ok()
}

impl RenderSurface for ScriptedSurface {
    fn find_one(&self, selector: &str) -> SurfaceResult<Option<NodeHandle>> {
        self.calls.borrow_mut().push(Call::FindOne(selector.to_string()));
        let page = self.current.get();
        if selector == self.selectors.no_results {
            return Ok(self.no_results.then(|| encode(Kind::Sentinel, page, 0)));
        }
        if selector == self.selectors.scroll_anchor {
            return Ok(self.anchor.then(|| encode(Kind::Anchor, page, 0)));
        }
        if let Some(target) = control_page(selector) {
            let exists = (1..=self.pages.len()).contains(&target);
            return Ok(exists.then(|| encode(Kind::PageControl, page, target)));
        }
        Ok(self.find_all(selector)?.into_iter().next())
    }

    fn find_all(&self, selector: &str) -> SurfaceResult<Vec<NodeHandle>> {
        self.calls.borrow_mut().push(Call::FindAll(selector.to_string()));
        self.check_available()?;
        let page = self.current.get();
        let listings = self.listings();
        if selector == self.selectors.listing {
            return Ok((0..listings.len())
                .map(|i| encode(Kind::Container, page, i))
                .collect());
        }
        let Some(kind) = self.field_kind(selector) else {
            return Ok(Vec::new());
        };
        Ok(listings
            .iter()
            .enumerate()
            .filter(|(_, l)| Self::has_field(l, kind))
            .map(|(i, _)| encode(kind, page, i))
            .collect())
    }

    fn find_within(&self, scope: NodeHandle, selector: &str) -> SurfaceResult<Option<NodeHandle>> {
        self.calls.borrow_mut().push(Call::FindWithin(selector.to_string()));
        self.check_available()?;
        let (kind, index) = self.live(scope)?;
        if kind != Kind::Container {
            return Ok(None);
        }
        let Some(field) = self.field_kind(selector) else {
            return Ok(None);
        };
        let present = self
            .listings()
            .get(index)
            .is_some_and(|l| Self::has_field(l, field));
        Ok(present.then(|| encode(field, self.current.get(), index)))
    }

    fn text(&self, node: NodeHandle) -> SurfaceResult<String> {
        self.calls.borrow_mut().push(Call::Text);
        self.check_available()?;
        let (kind, index) = self.live(node)?;
        let Some(listing) = self.listings().get(index) else {
            return Ok(String::new());
        };
        let text = match kind {
            Kind::Title | Kind::Link => listing.title.clone(),
            Kind::Location => listing.location.clone(),
            Kind::Employer => listing.employer.clone(),
            _ => None,
        };
        Ok(text.unwrap_or_default())
    }

    fn attribute(&self, node: NodeHandle, name: &str) -> SurfaceResult<Option<String>> {
        self.calls.borrow_mut().push(Call::Attribute);
        self.check_available()?;
        let (kind, index) = self.live(node)?;
        if kind != Kind::Link || name != "href" {
            return Ok(None);
        }
        Ok(self.listings().get(index).and_then(|l| l.href.clone()))
    }

    fn click(&self, node: NodeHandle) -> SurfaceResult<()> {
        let (kind, target) = self.live(node)?;
        if kind == Kind::PageControl {
            self.calls.borrow_mut().push(Call::Click { page: target });
            self.current.set(target);
        }
        Ok(())
    }

    fn scroll_from_anchor(&self, anchor: NodeHandle, _dx: i64, _dy: i64) -> SurfaceResult<()> {
        self.live(anchor)?;
        self.calls.borrow_mut().push(Call::Scroll);
        Ok(())
    }

    fn wait(&self, duration: Duration) {
        self.calls.borrow_mut().push(Call::Wait(duration));
    }

    fn current_url(&self) -> Option<String> {
        Some("https://jobs.example.com/search/?keywords=rust".to_string())
    }
}

#[derive(Default, Clone)]
pub struct TestSink {
    events: Arc<Mutex<Vec<ScrapeEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<ScrapeEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: ScrapeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
