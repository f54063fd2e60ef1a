//! # World Snapshot Decoder
//!
//! Decompresses and parses a `GWC` packet's payload into a tile grid.
//!
//! The snapshot is an LZMA-compressed BSON document carrying the world
//! dimensions (`WorldSizeSettingsType.WorldSizeX/Y`), the spawn point
//! (`WorldStartPoint.x/y`) and two flat byte buffers (`BlockLayer`,
//! `BackgroundLayer`) holding one little-endian `i16` per cell in
//! row-major order (y outer, x inner).
//!
//! Decompression is bounded by [`MAX_SNAPSHOT_SIZE`] to protect against
//! decompression bombs, and both layer buffers are length-checked before
//! any tile is read.

use std::io::Cursor;
use std::time::{Duration, Instant};

use bson::{Bson, Document};
use lzma_rs::decompress::Options;
use tracing::debug;

use crate::config::MAX_SNAPSHOT_SIZE;
use crate::error::{ProtocolError, Result};

/// Spawn coordinates are expressed in door units; dividing by this factor
/// yields movement units.
const DOOR_UNIT_DIVISOR: f64 = 3.2;

/// One cell's foreground/background block identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub fore_id: i16,
    pub back_id: i16,
}

/// The decoded map data for the destination game world.
///
/// Owned exclusively by the session; replaced wholesale on each
/// world-data packet, never mutated in place.
#[derive(Debug, Clone)]
pub struct World {
    pub size_x: i32,
    pub size_y: i32,
    pub main_door_x: f64,
    pub main_door_y: f64,
    loaded_at: Instant,
    tiles: Vec<Tile>,
}

impl World {
    /// Time elapsed since the snapshot finished decoding. Seeds the
    /// session's settle check before spawning.
    pub fn age(&self) -> Duration {
        self.loaded_at.elapsed()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, x: i32, y: i32) -> Option<&Tile> {
        if x < 0 || y < 0 || x >= self.size_x || y >= self.size_y {
            return None;
        }
        self.tiles.get((x + y * self.size_x) as usize)
    }

    /// Spawn position in movement units.
    pub fn spawn_position(&self) -> (f64, f64) {
        (
            self.main_door_x / DOOR_UNIT_DIVISOR,
            self.main_door_y / DOOR_UNIT_DIVISOR,
        )
    }
}

/// Decompress and parse one world snapshot.
///
/// Runs synchronously; the client wraps it in `spawn_blocking` so the
/// event loop keeps draining the socket while a large snapshot inflates.
///
/// # Errors
/// - `Decompression` if the LZMA stream is invalid or exceeds the size cap
/// - `Document` / `MissingField` for a malformed snapshot document
/// - `InvalidWorldSize` for non-positive dimensions
/// - `TruncatedLayer` if a layer buffer is shorter than `size_x*size_y*2`
pub fn decode_snapshot(compressed: &[u8]) -> Result<World> {
    let mut raw = Vec::new();
    let options = Options {
        memlimit: Some(MAX_SNAPSHOT_SIZE),
        ..Options::default()
    };
    lzma_rs::lzma_decompress_with_options(&mut Cursor::new(compressed), &mut raw, &options)
        .map_err(|_| ProtocolError::Decompression)?;
    if raw.len() > MAX_SNAPSHOT_SIZE {
        return Err(ProtocolError::Decompression);
    }

    let doc = Document::from_reader(Cursor::new(raw.as_slice()))?;

    let size = doc
        .get_document("WorldSizeSettingsType")
        .map_err(|_| ProtocolError::MissingField("WorldSizeSettingsType"))?;
    let size_x = get_int(size, "WorldSizeX")?;
    let size_y = get_int(size, "WorldSizeY")?;
    if size_x <= 0 || size_y <= 0 {
        return Err(ProtocolError::InvalidWorldSize(size_x, size_y));
    }

    let start = doc
        .get_document("WorldStartPoint")
        .map_err(|_| ProtocolError::MissingField("WorldStartPoint"))?;
    let main_door_x = get_float(start, "x")?;
    let main_door_y = get_float(start, "y")?;

    let cells = size_x as usize * size_y as usize;
    let fg = get_layer(&doc, "BlockLayer", cells)?;
    let bg = get_layer(&doc, "BackgroundLayer", cells)?;

    let mut tiles = Vec::with_capacity(cells);
    for y in 0..size_y {
        for x in 0..size_x {
            let i = (x + y * size_x) as usize * 2;
            tiles.push(Tile {
                fore_id: i16::from_le_bytes([fg[i], fg[i + 1]]),
                back_id: i16::from_le_bytes([bg[i], bg[i + 1]]),
            });
        }
    }

    debug!(size_x, size_y, main_door_x, main_door_y, "world snapshot decoded");
    Ok(World {
        size_x,
        size_y,
        main_door_x,
        main_door_y,
        loaded_at: Instant::now(),
        tiles,
    })
}

fn get_int(doc: &Document, field: &'static str) -> Result<i32> {
    match doc.get(field) {
        Some(Bson::Int32(n)) => Ok(*n),
        Some(Bson::Int64(n)) => i32::try_from(*n).map_err(|_| ProtocolError::MissingField(field)),
        _ => Err(ProtocolError::MissingField(field)),
    }
}

fn get_float(doc: &Document, field: &'static str) -> Result<f64> {
    match doc.get(field) {
        Some(Bson::Double(v)) => Ok(*v),
        Some(Bson::Int32(n)) => Ok(f64::from(*n)),
        Some(Bson::Int64(n)) => Ok(*n as f64),
        _ => Err(ProtocolError::MissingField(field)),
    }
}

fn get_layer<'a>(doc: &'a Document, field: &'static str, cells: usize) -> Result<&'a [u8]> {
    let bytes = match doc.get(field) {
        Some(Bson::Binary(bin)) => bin.bytes.as_slice(),
        _ => return Err(ProtocolError::MissingField(field)),
    };
    let expected = cells * 2;
    if bytes.len() < expected {
        return Err(ProtocolError::TruncatedLayer {
            layer: field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}
