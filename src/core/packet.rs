//! # Packet Type
//!
//! One tagged protocol message: a BSON mapping with a mandatory string
//! `ID` field plus tag-specific fields (string, int32, int64, double,
//! byte buffer, or nested mapping values).
//!
//! Inbound tags are classified into [`PacketKind`] for dispatch; tags the
//! client does not recognize pass through as `Unknown` so new server
//! messages never break dispatch. Outbound packets are built through the
//! constructors on [`Packet`], which pin down the exact field layout the
//! server expects.

use bson::spec::BinarySubtype;
use bson::{doc, Binary, Bson, Document};

use crate::error::{ProtocolError, Result};

/// Protocol tags understood by the client.
pub mod tag {
    /// Verify challenge (inbound) / login (outbound)
    pub const VERIFY: &str = "VChk";
    /// Credential ack (inbound) / credentials (outbound)
    pub const CREDENTIALS: &str = "GPd";
    /// World transfer (inbound) / join world (outbound)
    pub const TRANSFER: &str = "TTjW";
    /// Redirect to another server address
    pub const REDIRECT: &str = "OoIP";
    /// Compressed world snapshot
    pub const WORLD_DATA: &str = "GWC";
    /// Chat message broadcast
    pub const CHAT: &str = "WCM";
    /// Get world data request
    pub const GET_WORLD: &str = "Gw";
    /// Periodic time sync
    pub const SYNC_TIME: &str = "ST";
    /// Spawn request
    pub const SPAWN: &str = "RtP";
    /// Discrete grid move
    pub const MOVE: &str = "mp";
    /// Continuous position update
    pub const POSITION: &str = "mP";
    /// Client info preamble, fire-and-forget
    pub const CLIENT_INFO: &str = "gLSI";
}

/// Dispatch classification of an inbound packet tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketKind {
    VerifyChallenge,
    CredentialAck,
    WorldTransfer,
    Redirect,
    WorldData,
    Chat,
    Unknown,
}

impl PacketKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            tag::VERIFY => PacketKind::VerifyChallenge,
            tag::CREDENTIALS => PacketKind::CredentialAck,
            tag::TRANSFER => PacketKind::WorldTransfer,
            tag::REDIRECT => PacketKind::Redirect,
            tag::WORLD_DATA => PacketKind::WorldData,
            tag::CHAT => PacketKind::Chat,
            _ => PacketKind::Unknown,
        }
    }
}

/// One tagged protocol message.
///
/// Wraps the raw BSON document so unrecognized fields pass through
/// verbatim; identity is the `ID` tag.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    doc: Document,
}

impl Packet {
    /// Wrap a decoded document, validating the mandatory `ID` tag.
    pub fn from_document(doc: Document) -> Result<Self> {
        if !matches!(doc.get("ID"), Some(Bson::String(_))) {
            return Err(ProtocolError::MissingPacketId);
        }
        Ok(Self { doc })
    }

    pub fn id(&self) -> &str {
        // validated in from_document and by every constructor
        match self.doc.get("ID") {
            Some(Bson::String(id)) => id,
            _ => "",
        }
    }

    pub fn kind(&self) -> PacketKind {
        PacketKind::from_id(self.id())
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Read a mandatory string field.
    pub fn get_str(&self, field: &'static str) -> Result<&str> {
        self.doc
            .get_str(field)
            .map_err(|_| ProtocolError::MissingField(field))
    }

    /// Read a mandatory byte-buffer field (any binary subtype).
    pub fn get_bytes(&self, field: &'static str) -> Result<&[u8]> {
        match self.doc.get(field) {
            Some(Bson::Binary(bin)) => Ok(&bin.bytes),
            _ => Err(ProtocolError::MissingField(field)),
        }
    }

    /// Read a mandatory nested-mapping field.
    pub fn get_document(&self, field: &'static str) -> Result<&Document> {
        self.doc
            .get_document(field)
            .map_err(|_| ProtocolError::MissingField(field))
    }

    // ---- outbound constructors ----

    /// Login announcement sent immediately after the transport connects.
    pub fn login() -> Self {
        Self {
            doc: doc! { "ID": tag::VERIFY, "OS": "WindowsPlayer", "OSt": 3i32 },
        }
    }

    /// Fire-and-forget client info preamble; the server sends no
    /// documented response.
    pub fn client_info() -> Self {
        Self {
            doc: doc! { "ID": tag::CLIENT_INFO },
        }
    }

    /// Stored login identity, sent in answer to the verify challenge.
    /// Empty strings register a fresh account server-side.
    pub fn credentials(co_id: &str, token: &str) -> Self {
        Self {
            doc: doc! { "ID": tag::CREDENTIALS, "CoID": co_id, "Tk": token, "cgy": 877i32 },
        }
    }

    /// Request to join the named destination world.
    pub fn join_world(world: &str) -> Self {
        Self {
            doc: doc! { "ID": tag::TRANSFER, "W": world, "Amt": 0i32 },
        }
    }

    /// Request the snapshot of the world named by the transfer packet.
    pub fn get_world(world: &str) -> Self {
        Self {
            doc: doc! { "ID": tag::GET_WORLD, "eID": "", "W": world },
        }
    }

    /// Periodic time sync carrying the protocol timestamp.
    pub fn sync_time(timestamp: i64) -> Self {
        Self {
            doc: doc! { "ID": tag::SYNC_TIME, "STime": timestamp },
        }
    }

    /// Spawn request, sent once the world snapshot has been requested.
    pub fn spawn_request() -> Self {
        Self {
            doc: doc! { "ID": tag::SPAWN },
        }
    }

    /// Discrete grid move: payload is 8 raw bytes, two little-endian
    /// 32-bit integers.
    pub fn move_discrete(grid_x: i32, grid_y: i32) -> Self {
        let mut payload = Vec::with_capacity(8);
        payload.extend_from_slice(&grid_x.to_le_bytes());
        payload.extend_from_slice(&grid_y.to_le_bytes());
        Self {
            doc: doc! {
                "ID": tag::MOVE,
                "pM": Bson::Binary(Binary { subtype: BinarySubtype::Generic, bytes: payload }),
            },
        }
    }

    /// Continuous position update with the raw floating-point position.
    pub fn move_position(x: f64, y: f64, timestamp: i64, a: i32, d: i32) -> Self {
        Self {
            doc: doc! { "ID": tag::POSITION, "t": timestamp, "x": x, "y": y, "a": a, "d": d },
        }
    }
}
