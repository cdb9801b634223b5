//! In-memory rendering engine for tests.
//!
//! Documents are encoded as `%FAKE <pages>` optionally followed by
//! `broken=<n>,<m>` naming one-based pages that fail to rasterize. Every page is
//! 40 x 30 points; pixels encode the page number and position so tests can
//! tell rasters apart.

use crate::engine::{DocumentEngine, EngineDocument, PageSize};
use crate::error::EngineError;
use image::{Rgba, RgbaImage};

pub const PAGE_SIZE: PageSize = PageSize::new(40.0, 30.0);

/// Alpha of every fake pixel; deliberately not opaque
pub const PAGE_ALPHA: u8 = 200;

#[derive(Debug, Default, Clone, Copy)]
pub struct FakeEngine;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeDocument {
    page_count: usize,
    broken: Vec<usize>,
}

impl FakeDocument {
    pub fn encode(pages: usize) -> Vec<u8> {
        format!("%FAKE {pages}").into_bytes()
    }

    pub fn encode_with_broken(pages: usize, broken: &[usize]) -> Vec<u8> {
        if broken.is_empty() {
            return Self::encode(pages);
        }
        let list: Vec<String> = broken.iter().map(ToString::to_string).collect();
        format!("%FAKE {pages} broken={}", list.join(",")).into_bytes()
    }

    fn decode(bytes: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(bytes).ok()?;
        let mut parts = text.strip_prefix("%FAKE ")?.split_whitespace();
        let page_count = parts.next()?.parse().ok()?;
        let broken = match parts.next() {
            Some(list) => list
                .strip_prefix("broken=")?
                .split(',')
                .map(|n| n.parse().ok())
                .collect::<Option<Vec<usize>>>()?,
            None => Vec::new(),
        };
        Some(Self { page_count, broken })
    }
}

/// The light-mode pixel the fake engine draws at (x, y) on a page
pub fn fake_pixel(page: usize, x: u32, y: u32) -> Rgba<u8> {
    Rgba([(page * 40 % 256) as u8, (x % 256) as u8, (y % 256) as u8, PAGE_ALPHA])
}

impl DocumentEngine for FakeEngine {
    type Document = FakeDocument;

    fn open(&self, bytes: Vec<u8>) -> Result<FakeDocument, EngineError> {
        FakeDocument::decode(&bytes).ok_or_else(|| EngineError::new("not a fake document"))
    }
}

impl EngineDocument for FakeDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn page_size(&self, index: usize) -> Result<PageSize, EngineError> {
        if index < self.page_count {
            Ok(PAGE_SIZE)
        } else {
            Err(EngineError::new(format!("no page at index {index}")))
        }
    }

    fn rasterize(&self, index: usize, width: u32, height: u32) -> Result<RgbaImage, EngineError> {
        let page = index + 1;
        if self.broken.contains(&page) {
            return Err(EngineError::new("corrupt content stream"));
        }
        Ok(RgbaImage::from_fn(width, height, |x, y| fake_pixel(page, x, y)))
    }
}
