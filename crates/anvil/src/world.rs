//! Enumeration of the region files making up a world directory.
//!
//! A world stores dimension 0 under `region/` and every other dimension `n` under
//! `DIM<n>/region/`. Region files are named `r.<rx>.<rz>.mca` (anvil) or
//! `r.<rx>.<rz>.mcr` (the older region format).

use std::{fs, io};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;


/// The two on-disk world save formats, distinguished by region-file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveFormat {
    /// Modern saves; region files end in `.mca`.
    Anvil,
    /// Pre-anvil saves; region files end in `.mcr`.
    Region,
}

impl SaveFormat {
    /// The region-file extension for this format, without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Anvil  => "mca",
            Self::Region => "mcr",
        }
    }
}

impl FromStr for SaveFormat {
    type Err = UnknownFormatError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "anvil"  => Ok(Self::Anvil),
            "region" => Ok(Self::Region),
            _ => Err(UnknownFormatError(name.into())),
        }
    }
}

/// A save-format name which is neither `anvil` nor `region`.
#[derive(Error, Debug, Clone)]
#[error("unknown save format \"{0}\"")]
pub struct UnknownFormatError(Box<str>);

/// A region file found on disk, along with the region coordinates encoded in its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFileInfo {
    pub path: PathBuf,
    pub x: i32,
    pub z: i32,
}

/// Extracts region coordinates from a `r.<rx>.<rz>.mca` or `r.<rx>.<rz>.mcr` file
/// name, or returns `None` if the name does not follow that pattern.
pub fn region_pos_from_path(path: &Path) -> Option<(i32, i32)> {
    let name = path.file_name()?.to_str()?;
    let mut parts = name.split('.');

    if parts.next()? != "r" {
        return None;
    }
    let x = parts.next()?.parse().ok()?;
    let z = parts.next()?.parse().ok()?;
    if !matches!(parts.next()?, "mca" | "mcr") {
        return None;
    }

    match parts.next() {
        None => Some((x, z)),
        Some(_) => None,
    }
}

/// Lists the region files of the chosen format in the given `region` directory.
///
/// Only regular files whose names carry region coordinates and the format's extension
/// are returned. The order follows the directory listing and is unspecified.
pub fn enumerate_region_files<P: AsRef<Path>>(
    dir: P,
    format: SaveFormat,
) -> io::Result<Vec<RegionFileInfo>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some((x, z)) = region_pos_from_path(&path) else {
            continue;
        };
        if path.extension().and_then(|ext| ext.to_str()) == Some(format.extension()) {
            files.push(RegionFileInfo { path, x, z });
        }
    }

    Ok(files)
}

/// Maps the dimensions of a world directory to their region files: `region/` is
/// dimension 0, and `DIM<n>/region/` is dimension `n`.
pub fn enumerate_world<P: AsRef<Path>>(
    dir: P,
    format: SaveFormat,
) -> io::Result<BTreeMap<i32, Vec<RegionFileInfo>>> {
    let mut dimensions = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };

        if name == "region" {
            dimensions.insert(0, enumerate_region_files(&path, format)?);
        } else if let Some(dimension) = parse_dimension(name) {
            let region_dir = path.join("region");
            if region_dir.is_dir() {
                dimensions.insert(dimension, enumerate_region_files(&region_dir, format)?);
            }
        }
    }

    Ok(dimensions)
}

fn parse_dimension(name: &str) -> Option<i32> {
    name.strip_prefix("DIM")?.parse().ok()
}
