//! Shared fixtures for integration tests.

// Not every test file uses every fixture
#![allow(dead_code)]

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;

use basetint::services::Fetcher;

/// In-memory fetcher serving canned bodies and recording every request.
pub struct FakeFetcher {
    bodies: HashMap<String, String>,
    log: RefCell<Vec<String>>,
}

impl FakeFetcher {
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        Self {
            bodies: pairs
                .iter()
                .map(|(u, b)| ((*u).to_string(), (*b).to_string()))
                .collect(),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Total number of fetches issued.
    pub fn fetch_count(&self) -> usize {
        self.log.borrow().len()
    }

    /// Number of fetches issued for one URL.
    pub fn fetch_count_for(&self, url: &str) -> usize {
        self.log.borrow().iter().filter(|u| u.as_str() == url).count()
    }
}

impl Fetcher for FakeFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.log.borrow_mut().push(url.to_string());
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no canned body for {url}"))
    }
}

/// A scheme-definition document with `base00 = 000000`, `base08 = ff0000`,
/// and every other slot `aabbcc`.
pub fn sample_scheme_yaml() -> String {
    let mut doc = String::from("scheme: \"Test Red\"\nauthor: \"Fixture Author\"\n");
    for i in 0..16u8 {
        let value = match i {
            0 => "000000",
            8 => "ff0000",
            _ => "aabbcc",
        };
        doc.push_str(&format!("base{i:02X}: \"{value}\"\n"));
    }
    doc
}
