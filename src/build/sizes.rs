//! Gzip size measurement and the post-build size report.

use flate2::write::GzEncoder;
use flate2::Compression;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::sync::LazyLock;
use walkdir::WalkDir;

use crate::error::Result;

/// Growth at or beyond which a delta is rendered as large.
pub const LARGE_DELTA: u64 = 50 * 1024;

static HASHED_ASSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/?(.*)(\.[0-9a-f]+)(\.chunk)?(\.js|\.css)$").expect("HASHED_ASSET must compile")
});

/// Gzipped sizes keyed by hash-free relative path.
pub type FileSizes = BTreeMap<String, u64>;

/// Gzip `bytes` at the default level and return the compressed length.
pub fn gzip_size(bytes: &[u8]) -> io::Result<u64> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    let compressed = encoder.finish()?;
    Ok(compressed.len() as u64)
}

/// Strip the content hash so builds can be compared.
///
/// ```
/// use tvbuild::build::sizes::remove_file_name_hash;
///
/// assert_eq!(remove_file_name_hash("static/js/main.1a2b3c4d.js"), "static/js/main.js");
/// assert_eq!(remove_file_name_hash("static/js/2.ff00aa.chunk.js"), "static/js/2.js");
/// assert_eq!(remove_file_name_hash("robots.txt"), "robots.txt");
/// ```
pub fn remove_file_name_hash(relative: &str) -> String {
    HASHED_ASSET.replace(relative, "$1$4").into_owned()
}

/// Whether the report covers this file.
pub fn is_reportable(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("js") | Some("css")
    )
}

/// Measure every reportable file under `dir`.
///
/// A missing directory yields an empty map, which is the normal case on the
/// first build.
pub fn measure_file_sizes(dir: &Path) -> Result<FileSizes> {
    let mut sizes = FileSizes::new();
    for asset in scan_assets(dir)? {
        sizes.insert(remove_file_name_hash(&asset.0), asset.1);
    }
    Ok(sizes)
}

fn scan_assets(dir: &Path) -> Result<Vec<(String, u64)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut assets = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() || !is_reportable(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(dir) else {
            continue;
        };
        let bytes = fs::read(entry.path())?;
        assets.push((to_slash(relative), gzip_size(&bytes)?));
    }
    Ok(assets)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Human-readable byte count.
///
/// ```
/// use tvbuild::build::sizes::format_size;
///
/// assert_eq!(format_size(512), "512 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(3 * 1024 * 1024), "3 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, unit)
}

/// How an asset changed relative to the previous build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeDelta {
    /// New asset, or unchanged size.
    None,
    /// Grew by at least [`LARGE_DELTA`].
    Large(u64),
    Grew(u64),
    Shrank(u64),
}

impl SizeDelta {
    fn between(previous: Option<u64>, current: u64) -> Self {
        match previous {
            Some(prev) if current >= prev + LARGE_DELTA => Self::Large(current - prev),
            Some(prev) if current > prev => Self::Grew(current - prev),
            Some(prev) if current < prev => Self::Shrank(prev - current),
            _ => Self::None,
        }
    }

    /// Signed label, e.g. `+1.2 KB`; empty when there is nothing to show.
    pub fn label(self) -> String {
        match self {
            Self::None => String::new(),
            Self::Large(d) | Self::Grew(d) => format!("+{}", format_size(d)),
            Self::Shrank(d) => format!("-{}", format_size(d)),
        }
    }
}

/// One row of the size report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeEntry {
    /// Path relative to the output directory, hash included.
    pub path: String,
    /// Gzipped size in bytes.
    pub size: u64,
    /// Gzipped size of the same asset in the previous build.
    pub previous: Option<u64>,
    /// Whether the size exceeds its threshold.
    pub large: bool,
}

impl SizeEntry {
    /// Whether this is the entry bundle rather than a lazily loaded chunk.
    pub fn is_main_bundle(&self) -> bool {
        self.path
            .rsplit('/')
            .next()
            .is_some_and(|name| name.starts_with("main."))
    }

    pub fn delta(&self) -> SizeDelta {
        SizeDelta::between(self.previous, self.size)
    }
}

/// Sizes of the freshly built assets, largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeReport {
    entries: Vec<SizeEntry>,
}

impl SizeReport {
    /// Measure `output_dir` and compare against `previous`.
    pub fn collect(
        output_dir: &Path,
        previous: &FileSizes,
        bundle_warn_size: u64,
        chunk_warn_size: u64,
    ) -> Result<Self> {
        let mut entries: Vec<SizeEntry> = scan_assets(output_dir)?
            .into_iter()
            .map(|(path, size)| {
                let previous = previous.get(&remove_file_name_hash(&path)).copied();
                let mut entry = SizeEntry {
                    path,
                    size,
                    previous,
                    large: false,
                };
                let limit = if entry.is_main_bundle() {
                    bundle_warn_size
                } else {
                    chunk_warn_size
                };
                entry.large = entry.size > limit;
                entry
            })
            .collect();

        entries.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SizeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any asset is over its threshold.
    pub fn has_large_assets(&self) -> bool {
        self.entries.iter().any(|e| e.large)
    }

    /// `(previous, current)` per hash-free path.
    pub fn deltas(&self) -> BTreeMap<String, (Option<u64>, u64)> {
        self.entries
            .iter()
            .map(|e| (remove_file_name_hash(&e.path), (e.previous, e.size)))
            .collect()
    }
}
