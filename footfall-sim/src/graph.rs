use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};
use url::Url;

/// HTTP method carried by a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
        }
    }

    /// Status code used when a transition does not specify one.
    pub fn default_status(&self) -> u16 {
        match self {
            Method::Post => 201,
            _ => 200,
        }
    }
}

/// Handle to a page registered in a [`SiteGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(usize);

impl PageId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A directed edge out of a page. A transition with no destination marks
/// the end of a session rather than a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub method: Method,
    pub status: u16,
    pub mean_seconds: f64,
    pub destination: Option<PageId>,
}

/// One URL on the simulated site.
#[derive(Debug, Clone)]
pub struct Page {
    pub domain: String,
    pub path: String,
    pub size: u64,
    pub quit_probability: f64,
    pub outlinks: Vec<(f64, Transition)>,
}

impl Page {
    /// Build a page from an absolute URL. The URL must carry a host.
    pub fn new(url: &str, size: u64, quit_probability: f64) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| SimError::InvalidSite(format!("invalid page URL '{}': {}", url, e)))?;
        let domain = parsed
            .host_str()
            .ok_or_else(|| SimError::InvalidSite(format!("page URL '{}' has no host", url)))?
            .to_string();
        let path = match parsed.path() {
            "" => "/".to_string(),
            p => p.to_string(),
        };
        if !(0.0..=1.0).contains(&quit_probability) {
            return Err(SimError::InvalidSite(format!(
                "quit probability {} for '{}' is outside [0, 1]",
                quit_probability, url
            )));
        }
        Ok(Self {
            domain,
            path,
            size,
            quit_probability,
            outlinks: Vec::new(),
        })
    }

    /// Domain and path joined, as it appears in the referer field.
    pub fn address(&self) -> String {
        format!("{}{}", self.domain, self.path)
    }
}

/// The page/transition topology shared by every customer in a run.
/// Read-only once construction is finished.
#[derive(Debug, Clone, Default)]
pub struct SiteGraph {
    pages: Vec<Page>,
}

impl SiteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_page(&mut self, page: Page) -> PageId {
        self.pages.push(page);
        PageId(self.pages.len() - 1)
    }

    /// Append a weighted transition to the source page's outgoing list.
    /// `destination` of `None` marks session end; `status` of `None`
    /// defaults by method.
    pub fn add_next_page(
        &mut self,
        source: PageId,
        destination: Option<PageId>,
        method: Method,
        status: Option<u16>,
        mean_seconds: f64,
        weight: f64,
    ) -> Result<()> {
        self.check_bounds(source)?;
        if let Some(dest) = destination {
            self.check_bounds(dest)?;
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(SimError::InvalidSite(format!(
                "transition weight {} out of {} is negative or non-finite",
                weight,
                self.pages[source.0].address()
            )));
        }
        if !mean_seconds.is_finite() || mean_seconds < 0.0 {
            return Err(SimError::InvalidSite(format!(
                "mean dwell {} out of {} is negative or non-finite",
                mean_seconds,
                self.pages[source.0].address()
            )));
        }
        let transition = Transition {
            method,
            status: status.unwrap_or_else(|| method.default_status()),
            mean_seconds,
            destination,
        };
        self.pages[source.0].outlinks.push((weight, transition));
        Ok(())
    }

    pub fn page(&self, id: PageId) -> &Page {
        &self.pages[id.0]
    }

    /// Handle for the page at `index`, if present. The first page of a
    /// spec is conventionally the walk's entry.
    pub fn page_id(&self, index: usize) -> Option<PageId> {
        (index < self.pages.len()).then_some(PageId(index))
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    fn check_bounds(&self, id: PageId) -> Result<()> {
        if id.0 >= self.pages.len() {
            return Err(SimError::InvalidSite(format!(
                "page index {} out of range ({} pages)",
                id.0,
                self.pages.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_parses_domain_and_path() {
        let page = Page::new("http://www.example.com/foo/bar.html", 4821, 0.2).unwrap();
        assert_eq!(page.domain, "www.example.com");
        assert_eq!(page.path, "/foo/bar.html");
        assert_eq!(page.address(), "www.example.com/foo/bar.html");
    }

    #[test]
    fn test_page_root_path() {
        let page = Page::new("http://shop.example.com", 100, 0.0).unwrap();
        assert_eq!(page.path, "/");
    }

    #[test]
    fn test_page_rejects_bad_url() {
        assert!(Page::new("not a url", 1, 0.0).is_err());
        assert!(Page::new("file:///tmp/x", 1, 0.0).is_err());
    }

    #[test]
    fn test_page_rejects_bad_quit_probability() {
        assert!(Page::new("http://a.example/", 1, -0.1).is_err());
        assert!(Page::new("http://a.example/", 1, 1.1).is_err());
    }

    #[test]
    fn test_method_default_status() {
        assert_eq!(Method::Get.default_status(), 200);
        assert_eq!(Method::Post.default_status(), 201);
        assert_eq!(Method::Put.default_status(), 200);
        assert_eq!(Method::Delete.default_status(), 200);
        assert_eq!(Method::Head.default_status(), 200);
    }

    #[test]
    fn test_add_next_page_appends_in_order() {
        let mut graph = SiteGraph::new();
        let a = graph.add_page(Page::new("http://a.example/", 1, 0.0).unwrap());
        let b = graph.add_page(Page::new("http://a.example/b", 2, 0.0).unwrap());
        graph
            .add_next_page(a, Some(b), Method::Get, None, 10.0, 3.0)
            .unwrap();
        graph
            .add_next_page(a, None, Method::Post, Some(204), 5.0, 1.0)
            .unwrap();

        let outlinks = &graph.page(a).outlinks;
        assert_eq!(outlinks.len(), 2);
        assert_eq!(outlinks[0].0, 3.0);
        assert_eq!(outlinks[0].1.status, 200);
        assert_eq!(outlinks[0].1.destination, Some(b));
        assert_eq!(outlinks[1].0, 1.0);
        assert_eq!(outlinks[1].1.status, 204);
        assert_eq!(outlinks[1].1.destination, None);
    }

    #[test]
    fn test_add_next_page_rejects_out_of_range() {
        let mut graph = SiteGraph::new();
        let a = graph.add_page(Page::new("http://a.example/", 1, 0.0).unwrap());
        let mut other = SiteGraph::new();
        other.add_page(Page::new("http://b.example/", 1, 0.0).unwrap());
        let stray = other.add_page(Page::new("http://b.example/c", 1, 0.0).unwrap());

        assert!(graph
            .add_next_page(a, Some(stray), Method::Get, None, 1.0, 1.0)
            .is_err());
    }

    #[test]
    fn test_add_next_page_rejects_bad_weight_and_dwell() {
        let mut graph = SiteGraph::new();
        let a = graph.add_page(Page::new("http://a.example/", 1, 0.0).unwrap());
        assert!(graph
            .add_next_page(a, Some(a), Method::Get, None, 1.0, -1.0)
            .is_err());
        assert!(graph
            .add_next_page(a, Some(a), Method::Get, None, f64::NAN, 1.0)
            .is_err());
    }

    #[test]
    fn test_self_loops_are_legal() {
        let mut graph = SiteGraph::new();
        let a = graph.add_page(Page::new("http://a.example/", 1, 0.0).unwrap());
        assert!(graph
            .add_next_page(a, Some(a), Method::Get, None, 1.0, 1.0)
            .is_ok());
    }
}
