//! Run statistics
//!
//! Counters are bumped from concurrent page tasks, so they are plain
//! atomics. A [`StatsSnapshot`] freezes them for reporting; the difference of
//! two snapshots gives the figures for a single site.

use crate::output::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters for a run
#[derive(Debug, Default)]
pub struct RunStats {
    pages_fetched: AtomicU64,
    documents_written: AtomicU64,
    binaries_downloaded: AtomicU64,
    skipped_visited: AtomicU64,
    listing_pages: AtomicU64,
    network_errors: AtomicU64,
    scraping_errors: AtomicU64,
    pdf_errors: AtomicU64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_fetched(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn document_written(&self) {
        self.documents_written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn binary_downloaded(&self) {
        self.binaries_downloaded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped_visited(&self) {
        self.skipped_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn listing_page(&self) {
        self.listing_pages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failure(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::Network => &self.network_errors,
            ErrorKind::Scraping => &self.scraping_errors,
            ErrorKind::PdfDownload => &self.pdf_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            documents_written: self.documents_written.load(Ordering::Relaxed),
            binaries_downloaded: self.binaries_downloaded.load(Ordering::Relaxed),
            skipped_visited: self.skipped_visited.load(Ordering::Relaxed),
            listing_pages: self.listing_pages.load(Ordering::Relaxed),
            network_errors: self.network_errors.load(Ordering::Relaxed),
            scraping_errors: self.scraping_errors.load(Ordering::Relaxed),
            pdf_errors: self.pdf_errors.load(Ordering::Relaxed),
        }
    }
}

/// Frozen copy of the run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub pages_fetched: u64,
    pub documents_written: u64,
    pub binaries_downloaded: u64,
    pub skipped_visited: u64,
    pub listing_pages: u64,
    pub network_errors: u64,
    pub scraping_errors: u64,
    pub pdf_errors: u64,
}

impl StatsSnapshot {
    pub fn total_errors(&self) -> u64 {
        self.network_errors + self.scraping_errors + self.pdf_errors
    }

    /// Counters accumulated since `earlier`
    pub fn since(&self, earlier: &StatsSnapshot) -> StatsSnapshot {
        StatsSnapshot {
            pages_fetched: self.pages_fetched.saturating_sub(earlier.pages_fetched),
            documents_written: self
                .documents_written
                .saturating_sub(earlier.documents_written),
            binaries_downloaded: self
                .binaries_downloaded
                .saturating_sub(earlier.binaries_downloaded),
            skipped_visited: self.skipped_visited.saturating_sub(earlier.skipped_visited),
            listing_pages: self.listing_pages.saturating_sub(earlier.listing_pages),
            network_errors: self.network_errors.saturating_sub(earlier.network_errors),
            scraping_errors: self.scraping_errors.saturating_sub(earlier.scraping_errors),
            pdf_errors: self.pdf_errors.saturating_sub(earlier.pdf_errors),
        }
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &StatsSnapshot, sites: usize) {
    println!("=== Run Statistics ===\n");

    println!("Overview:");
    println!("  Sites processed: {}", sites);
    println!("  Pages fetched: {}", stats.pages_fetched);
    println!("  Listing pages walked: {}", stats.listing_pages);
    println!("  Markdown documents written: {}", stats.documents_written);
    println!("  Binary files downloaded: {}", stats.binaries_downloaded);
    println!("  Skipped (already visited): {}", stats.skipped_visited);
    println!();

    if stats.total_errors() > 0 {
        println!("Error Summary:");
        for (kind, count) in [
            (ErrorKind::Network, stats.network_errors),
            (ErrorKind::Scraping, stats.scraping_errors),
            (ErrorKind::PdfDownload, stats.pdf_errors),
        ] {
            if count > 0 {
                println!("  {}: {}", kind, count);
            }
        }
        println!();
    }

    let attempted = stats.pages_fetched + stats.scraping_errors + stats.network_errors;
    let success_rate = if attempted > 0 {
        (stats.documents_written as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} documents / {} attempts)",
        success_rate, stats.documents_written, attempted
    );
}
