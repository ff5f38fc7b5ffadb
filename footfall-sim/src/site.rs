// Site spec loading: JSON description of pages and weighted links.

use crate::error::{Result, SimError};
use crate::graph::{Method, Page, PageId, SiteGraph};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// On-disk description of a site graph. Pages are referenced by index in
/// `links`; a `to` of null ends the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSpec {
    pub pages: Vec<PageSpec>,
    pub links: Vec<LinkSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub url: String,
    pub size: u64,
    #[serde(default)]
    pub quit: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub from: usize,
    pub to: Option<usize>,
    #[serde(default)]
    pub method: Method,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub weight: f64,
    pub mean_seconds: f64,
}

impl SiteSpec {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl SiteGraph {
    /// Materialize a spec into a graph, validating URLs, probabilities,
    /// weights, dwell times, and page indices.
    pub fn from_spec(spec: &SiteSpec) -> Result<Self> {
        if spec.pages.is_empty() {
            return Err(SimError::InvalidSite("spec contains no pages".to_string()));
        }
        let mut graph = SiteGraph::new();
        let ids: Vec<PageId> = spec
            .pages
            .iter()
            .map(|p| Ok(graph.add_page(Page::new(&p.url, p.size, p.quit)?)))
            .collect::<Result<_>>()?;
        for link in &spec.links {
            let source = *ids
                .get(link.from)
                .ok_or_else(|| bad_index("from", link.from, ids.len()))?;
            let destination = match link.to {
                Some(to) => Some(*ids.get(to).ok_or_else(|| bad_index("to", to, ids.len()))?),
                None => None,
            };
            graph.add_next_page(
                source,
                destination,
                link.method,
                link.status,
                link.mean_seconds,
                link.weight,
            )?;
        }
        Ok(graph)
    }
}

fn bad_index(field: &str, index: usize, pages: usize) -> SimError {
    SimError::InvalidSite(format!(
        "link '{}' index {} out of range ({} pages)",
        field, index, pages
    ))
}

/// Read and materialize a site spec from a JSON file.
pub fn load_site(path: &Path) -> Result<SiteGraph> {
    let content = fs::read_to_string(path)?;
    let spec = SiteSpec::from_json(&content)?;
    let graph = SiteGraph::from_spec(&spec)?;
    info!(
        pages = graph.len(),
        path = %path.display(),
        "loaded site spec"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SPEC: &str = r#"{
        "pages": [
            {"url": "http://www.example.com/index.html", "size": 3500, "quit": 0.2},
            {"url": "http://www.example.com/about.html", "size": 1200}
        ],
        "links": [
            {"from": 0, "to": 1, "weight": 2.0, "mean_seconds": 30.0},
            {"from": 1, "to": null, "method": "POST", "weight": 1.0, "mean_seconds": 5.0}
        ]
    }"#;

    #[test]
    fn test_spec_round_trip() {
        let spec = SiteSpec::from_json(SPEC).unwrap();
        assert_eq!(spec.pages.len(), 2);
        assert_eq!(spec.pages[1].quit, 0.0);
        assert_eq!(spec.links[0].method, Method::Get);
        assert_eq!(spec.links[1].to, None);

        let json = spec.to_json().unwrap();
        let again = SiteSpec::from_json(&json).unwrap();
        assert_eq!(again.links.len(), 2);
    }

    #[test]
    fn test_from_spec_builds_graph() {
        let spec = SiteSpec::from_json(SPEC).unwrap();
        let graph = SiteGraph::from_spec(&spec).unwrap();
        assert_eq!(graph.len(), 2);

        let index = &graph.pages()[0];
        assert_eq!(index.outlinks.len(), 1);
        assert_eq!(index.outlinks[0].1.status, 200);

        let about = &graph.pages()[1];
        assert_eq!(about.outlinks[0].1.status, 201);
        assert_eq!(about.outlinks[0].1.destination, None);
    }

    #[test]
    fn test_from_spec_rejects_out_of_range_link() {
        let spec = SiteSpec::from_json(
            r#"{
                "pages": [{"url": "http://a.example/", "size": 1}],
                "links": [{"from": 0, "to": 7, "weight": 1.0, "mean_seconds": 1.0}]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            SiteGraph::from_spec(&spec),
            Err(SimError::InvalidSite(_))
        ));
    }

    #[test]
    fn test_from_spec_rejects_empty_site() {
        let spec = SiteSpec::from_json(r#"{"pages": [], "links": []}"#).unwrap();
        assert!(SiteGraph::from_spec(&spec).is_err());
    }

    #[test]
    fn test_load_site_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SPEC.as_bytes()).unwrap();
        let graph = load_site(file.path()).unwrap();
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_load_site_missing_file() {
        assert!(matches!(
            load_site(Path::new("/nonexistent/site.json")),
            Err(SimError::IoError(_))
        ));
    }

    #[test]
    fn test_load_site_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{not json").unwrap();
        assert!(matches!(
            load_site(file.path()),
            Err(SimError::ParseError(_))
        ));
    }
}
