//! Utility modules supporting PubMed access.
//!
//! - [`HttpClient`]: `reqwest` client implementing [`crate::sources::Transport`]
//! - [`build_url`]: append percent-encoded query parameters to a base URL
//! - [`Element`]: XML element tree with ElementTree-style path lookups
//!
//! # Path lookups
//!
//! ```rust
//! use industry_papers::utils::Element;
//!
//! let root = Element::parse("<a><b><Id>1</Id></b><Id>2</Id></a>").unwrap();
//! let ids: Vec<String> = root.find_all(".//Id").iter().map(|e| e.text()).collect();
//! assert_eq!(ids, vec!["1", "2"]);
//! assert_eq!(root.find_text("b/Id").as_deref(), Some("1"));
//! ```

mod http;
mod xml;

pub use http::{build_url, HttpClient};
pub use xml::Element;
