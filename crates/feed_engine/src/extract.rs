use feed_core::ListingRecord;
use feed_logging::{feed_debug, feed_trace};
use url::Url;

use crate::links::canonicalize_link;
use crate::{ExtractionMode, FeedSelectors, NodeHandle, RenderSurface, SurfaceError, SurfaceResult};

/// Field lists read page-wide, one entry per matching node, unreconciled.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialBatch {
    pub titles: Vec<String>,
    pub links: Vec<String>,
    pub locations: Vec<String>,
    pub employers: Vec<String>,
}

impl PartialBatch {
    /// Pairs the lists by position. Titles decide the record count: a missing
    /// entry in any other list becomes an empty field and surplus entries are
    /// dropped.
    pub fn into_records(self) -> Vec<ListingRecord> {
        let PartialBatch {
            titles,
            links,
            locations,
            employers,
        } = self;
        let mut links = links.into_iter();
        let mut locations = locations.into_iter();
        let mut employers = employers.into_iter();
        titles
            .into_iter()
            .map(|title| ListingRecord {
                title,
                location: locations.next().unwrap_or_default(),
                employer: employers.next().unwrap_or_default(),
                link: links.next().unwrap_or_default(),
            })
            .collect()
    }
}

/// Reads listing records from whatever is currently mounted.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    selectors: FeedSelectors,
    mode: ExtractionMode,
    keep_query: bool,
}

impl PageExtractor {
    pub fn new(selectors: FeedSelectors, mode: ExtractionMode) -> Self {
        Self {
            selectors,
            mode,
            keep_query: false,
        }
    }

    pub fn with_keep_query(mut self, keep_query: bool) -> Self {
        self.keep_query = keep_query;
        self
    }

    pub fn extract(&self, surface: &dyn RenderSurface) -> SurfaceResult<Vec<ListingRecord>> {
        match self.mode {
            ExtractionMode::PerListing => self.extract_listings(surface),
            ExtractionMode::ParallelLists => Ok(self.extract_page(surface)?.into_records()),
        }
    }

    /// One record per listing node, every field read inside that node.
    /// Listing nodes without a title node are skipped.
    pub fn extract_listings(
        &self,
        surface: &dyn RenderSurface,
    ) -> SurfaceResult<Vec<ListingRecord>> {
        let base = base_url(surface);
        let containers = surface.find_all(&self.selectors.listing)?;
        let mut records = Vec::with_capacity(containers.len());
        for container in containers {
            let Some(title_node) = tolerate(surface.find_within(container, &self.selectors.title))?
            else {
                feed_trace!("listing {} has no title node, skipped", container);
                continue;
            };
            let title = read_text(surface, title_node)?;
            let location = self.text_within(surface, container, &self.selectors.location)?;
            let employer = self.text_within(surface, container, &self.selectors.employer)?;
            let href = match tolerate(surface.find_within(container, &self.selectors.link))? {
                Some(link_node) => read_href(surface, link_node)?,
                None => read_href(surface, title_node)?,
            };
            records.push(ListingRecord {
                title,
                location,
                employer,
                link: canonicalize_link(&href, base.as_ref(), self.keep_query),
            });
        }
        feed_debug!("extracted {} listings", records.len());
        Ok(records)
    }

    /// Reads each field category page-wide. Links are correlated to titles by
    /// matching link text against title text; with duplicate titles the first
    /// matching link wins.
    pub fn extract_page(&self, surface: &dyn RenderSurface) -> SurfaceResult<PartialBatch> {
        let base = base_url(surface);
        let titles = self.texts(surface, &self.selectors.title)?;

        let mut link_texts = Vec::new();
        for node in surface.find_all(&self.selectors.link)? {
            link_texts.push((node, read_text(surface, node)?));
        }

        let mut links = Vec::with_capacity(titles.len());
        for title in &titles {
            let mut candidates = link_texts
                .iter()
                .filter(|(_, text)| !title.is_empty() && text == title);
            let href = match candidates.next() {
                Some((node, _)) => {
                    let extra = candidates.count();
                    if extra > 0 {
                        feed_debug!(
                            "{} links share the title {:?}, using the first",
                            extra + 1,
                            title
                        );
                    }
                    read_href(surface, *node)?
                }
                None => {
                    feed_debug!("no link found for title {:?}", title);
                    String::new()
                }
            };
            links.push(canonicalize_link(&href, base.as_ref(), self.keep_query));
        }

        let batch = PartialBatch {
            locations: self.texts(surface, &self.selectors.location)?,
            employers: self.texts(surface, &self.selectors.employer)?,
            titles,
            links,
        };
        feed_debug!(
            "page lists: {} titles, {} locations, {} employers",
            batch.titles.len(),
            batch.locations.len(),
            batch.employers.len()
        );
        Ok(batch)
    }

    fn texts(&self, surface: &dyn RenderSurface, selector: &str) -> SurfaceResult<Vec<String>> {
        surface
            .find_all(selector)?
            .into_iter()
            .map(|node| read_text(surface, node))
            .collect()
    }

    fn text_within(
        &self,
        surface: &dyn RenderSurface,
        scope: NodeHandle,
        selector: &str,
    ) -> SurfaceResult<String> {
        match tolerate(surface.find_within(scope, selector))? {
            Some(node) => read_text(surface, node),
            None => Ok(String::new()),
        }
    }
}

fn base_url(surface: &dyn RenderSurface) -> Option<Url> {
    surface.current_url().and_then(|raw| Url::parse(&raw).ok())
}

/// A node unmounted mid-read counts as absent.
fn tolerate<T>(result: SurfaceResult<Option<T>>) -> SurfaceResult<Option<T>> {
    match result {
        Err(SurfaceError::Detached(node)) => {
            feed_trace!("node {} detached during lookup", node);
            Ok(None)
        }
        other => other,
    }
}

fn read_text(surface: &dyn RenderSurface, node: NodeHandle) -> SurfaceResult<String> {
    Ok(tolerate(surface.text(node).map(Some))?
        .map(|text| normalize_text(&text))
        .unwrap_or_default())
}

fn read_href(surface: &dyn RenderSurface, node: NodeHandle) -> SurfaceResult<String> {
    Ok(tolerate(surface.attribute(node, "href"))?.unwrap_or_default())
}

/// Collapses whitespace and repeated lines. Feeds often render a title twice,
/// once visibly and once for screen readers, which reads back as `"X\nX"`.
pub fn normalize_text(raw: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in raw.lines() {
        let line = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() || lines.last() == Some(&line) {
            continue;
        }
        lines.push(line);
    }
    lines.join(" ")
}
