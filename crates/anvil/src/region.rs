//! Reader for region files, the 4 KiB-paged containers holding up to 1024 chunk NBT
//! blobs.
//!
//! A region file starts with a sector-granular index of 1024 location entries; each
//! present chunk is a length-prefixed, individually compressed root NBT stream.
//! Oversized chunks are spilled into sibling `c.<cx>.<cz>.mcc` files and flagged in the
//! compression descriptor. The reader loads every present chunk's compressed bytes up
//! front and closes the file; decompression and NBT decoding happen on first access.

use std::mem;
use std::{fs, io};
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use byteorder::{BigEndian, ReadBytesExt as _};
use flate2::read::{GzDecoder, ZlibDecoder};
use log::warn;
use thiserror::Error;

use stronghold_nbt::NbtCompound;
use stronghold_nbt::io::{NbtIoError, read_compound};

use crate::world::region_pos_from_path;


/// The size in bytes of a region-file sector, the allocation unit for chunk payloads.
pub const SECTOR_SIZE: usize = 4096;

/// Region files hold a 32x32 grid of chunks.
pub const REGION_WIDTH: usize = 32;

const CHUNK_COUNT: usize = REGION_WIDTH * REGION_WIDTH;

/// The compression schemes a chunk payload may be stored with, by descriptor id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionScheme {
    /// Descriptor 1. Legacy; written by no current game version but still accepted.
    Gzip,
    /// Descriptor 2.
    Zlib,
    /// Descriptor 3.
    Uncompressed,
}

impl CompressionScheme {
    fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Gzip),
            2 => Some(Self::Zlib),
            3 => Some(Self::Uncompressed),
            _ => None,
        }
    }
}

/// A chunk parsed out of a region file: the root compound of its NBT blob. The
/// contents are opaque to this crate.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    nbt: NbtCompound,
}

impl Chunk {
    /// The chunk's root compound.
    #[inline]
    pub fn nbt(&self) -> &NbtCompound {
        &self.nbt
    }

    #[inline]
    pub fn into_nbt(self) -> NbtCompound {
        self.nbt
    }
}

enum Slot {
    Absent,
    Compressed {
        scheme: CompressionScheme,
        data: Vec<u8>,
    },
    Parsed(Chunk),
}

/// An in-memory region: up to 1024 chunks addressed by in-region `(x, z)` with
/// x, z in `0..32`.
pub struct Region {
    chunks: Vec<Slot>,
}

impl Region {
    /// Reads a region from a file.
    ///
    /// The file is read in one pass and closed before this function returns. A header
    /// truncated short of 4 KiB yields an empty region rather than an error. Chunks
    /// with an unsupported compression descriptor are skipped with a diagnostic. The
    /// region coordinates used to locate external `.mcc` chunk files are taken from
    /// the file name.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegionError> {
        let path = path.as_ref();
        let region_pos = region_pos_from_path(path);
        let file = fs::File::open(path)?;
        Self::read_from(&mut BufReader::new(file), path.parent(), region_pos)
    }

    /// Reads a region from an arbitrary seekable byte stream, such as an in-memory
    /// buffer. External `.mcc` chunks cannot be resolved without a backing file and
    /// are skipped with a diagnostic.
    pub fn from_reader<R: Read + Seek>(reader: &mut R) -> Result<Self, RegionError> {
        Self::read_from(reader, None, None)
    }

    fn read_from<R: Read + Seek>(
        reader: &mut R,
        dir: Option<&Path>,
        region_pos: Option<(i32, i32)>,
    ) -> Result<Self, RegionError> {
        let mut chunks: Vec<Slot> = (0 .. CHUNK_COUNT).map(|_| Slot::Absent).collect();

        let mut header = [0_u8; SECTOR_SIZE];
        if let Err(err) = reader.read_exact(&mut header) {
            return if err.kind() == io::ErrorKind::UnexpectedEof {
                warn!("region header shorter than {SECTOR_SIZE} bytes; treating the region as empty");
                Ok(Self { chunks })
            } else {
                Err(err.into())
            };
        }

        // Collect the present entries, then sort by file offset so the chunk pass
        // reads the file sequentially.
        let mut locations = Vec::new();
        for index in 0 .. CHUNK_COUNT {
            let base = index * 4;
            let entry = u32::from_be_bytes([
                header[base],
                header[base + 1],
                header[base + 2],
                header[base + 3],
            ]);
            if entry == 0 {
                continue;
            }
            locations.push(((entry >> 8) as u64, index));
        }
        locations.sort_unstable();

        for (offset_sectors, index) in locations {
            reader.seek(SeekFrom::Start(offset_sectors * SECTOR_SIZE as u64))?;
            let payload_len = reader.read_u32::<BigEndian>()?;
            let descriptor = reader.read_u8()?;

            let mut data = vec![0_u8; payload_len as usize];
            reader.read_exact(&mut data)?;

            let (x, z) = (index % REGION_WIDTH, index / REGION_WIDTH);
            let Some(scheme) = CompressionScheme::from_id(descriptor & 0x7F) else {
                warn!(
                    "chunk ({x}, {z}) uses unsupported compression {}; skipping",
                    descriptor & 0x7F,
                );
                continue;
            };

            if descriptor & 0x80 != 0 {
                // The payload lives in a sibling .mcc file; the in-region bytes are
                // padding.
                let Some(path) = external_chunk_path(dir, region_pos, x, z) else {
                    warn!(
                        "cannot resolve the external chunk file for ({x}, {z}) \
                        without region coordinates; skipping",
                    );
                    continue;
                };
                match fs::read(&path) {
                    Ok(bytes) => chunks[index] = Slot::Compressed { scheme, data: bytes },
                    Err(err) => {
                        warn!(
                            "could not read external chunk file {}: {err}; skipping",
                            path.display(),
                        );
                    }
                }
            } else {
                chunks[index] = Slot::Compressed { scheme, data };
            }
        }

        Ok(Self { chunks })
    }

    /// Returns the parsed chunk at in-region coordinates `(x, z)`, or `None` if that
    /// slot is absent. The chunk is decompressed and decoded on first access and the
    /// parsed result is cached.
    pub fn get_chunk(&mut self, x: usize, z: usize) -> Result<Option<&Chunk>, RegionError> {
        if x >= REGION_WIDTH || z >= REGION_WIDTH {
            return Err(RegionError::OutOfBounds { x, z });
        }

        let index = z * REGION_WIDTH + x;
        self.force_slot(index)?;
        match &self.chunks[index] {
            Slot::Parsed(chunk) => Ok(Some(chunk)),
            _ => Ok(None),
        }
    }

    /// Yields `(x, z, chunk)` for every present chunk in row-major order (z outer,
    /// x inner), regardless of where the chunks sit in the file.
    pub fn iter_nonempty(
        &mut self,
    ) -> Result<impl Iterator<Item = (usize, usize, &Chunk)>, RegionError> {
        for index in 0 .. CHUNK_COUNT {
            self.force_slot(index)?;
        }

        Ok(self
            .chunks
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| match slot {
                Slot::Parsed(chunk) => {
                    Some((index % REGION_WIDTH, index / REGION_WIDTH, chunk))
                }
                _ => None,
            }))
    }

    /// The number of present chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks
            .iter()
            .filter(|slot| !matches!(slot, Slot::Absent))
            .count()
    }

    /// Returns true when no chunk is present.
    pub fn is_empty(&self) -> bool {
        self.chunk_count() == 0
    }

    /// Decompresses and decodes the slot at `index` if that has not happened yet.
    fn force_slot(&mut self, index: usize) -> Result<(), RegionError> {
        let slot = mem::replace(&mut self.chunks[index], Slot::Absent);
        let (scheme, data) = match slot {
            Slot::Compressed { scheme, data } => (scheme, data),
            other => {
                self.chunks[index] = other;
                return Ok(());
            }
        };

        match parse_chunk(scheme, &data) {
            Ok(chunk) => {
                self.chunks[index] = Slot::Parsed(chunk);
                Ok(())
            }
            Err(err) => {
                // Keep the compressed bytes so the caller may retry
                self.chunks[index] = Slot::Compressed { scheme, data };
                Err(err)
            }
        }
    }
}

fn parse_chunk(scheme: CompressionScheme, data: &[u8]) -> Result<Chunk, RegionError> {
    let decompressed = decompress_chunk(scheme, data)?;
    let (nbt, _root_name) = read_compound(&mut decompressed.as_slice())?;
    Ok(Chunk { nbt })
}

fn decompress_chunk(scheme: CompressionScheme, data: &[u8]) -> io::Result<Vec<u8>> {
    let mut decompressed = Vec::new();
    match scheme {
        CompressionScheme::Gzip => {
            GzDecoder::new(data).read_to_end(&mut decompressed)?;
        }
        CompressionScheme::Zlib => {
            ZlibDecoder::new(data).read_to_end(&mut decompressed)?;
        }
        CompressionScheme::Uncompressed => decompressed.extend_from_slice(data),
    }
    Ok(decompressed)
}

fn external_chunk_path(
    dir: Option<&Path>,
    region_pos: Option<(i32, i32)>,
    x: usize,
    z: usize,
) -> Option<PathBuf> {
    let dir = dir?;
    let (rx, rz) = region_pos?;
    let cx = rx * REGION_WIDTH as i32 + x as i32;
    let cz = rz * REGION_WIDTH as i32 + z as i32;
    Some(dir.join(format!("c.{cx}.{cz}.mcc")))
}

/// An error produced while reading a region file or one of its chunks.
#[derive(Error, Debug)]
pub enum RegionError {
    /// A native I/O error.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// A chunk's decompressed payload was not a valid compound-rooted NBT stream.
    #[error(transparent)]
    Nbt(#[from] NbtIoError),
    /// Chunk coordinates outside the region's 32x32 grid.
    #[error("chunk coordinates ({x}, {z}) are outside the region's 32x32 grid")]
    OutOfBounds { x: usize, z: usize },
}
