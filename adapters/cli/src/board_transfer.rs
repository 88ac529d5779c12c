use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use tileslide_core::{GridSize, Tile};

const CODE_DOMAIN: &str = "tiles";
const CODE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded board payload.
pub(crate) const CODE_HEADER: &str = "tiles:v1";
/// Delimiter used to separate the prefix, grid size and payload.
const FIELD_DELIMITER: char = ':';

/// Portable description of a tile arrangement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BoardCode {
    /// Side length of the grid.
    pub(crate) size: GridSize,
    /// Tiles in row-major order, `0` marking the empty slot.
    pub(crate) tiles: Vec<Tile>,
}

impl BoardCode {
    /// Encodes the board into a single-line string suitable for copy and paste.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableBoard {
            tiles: self.tiles.iter().map(Tile::get).collect(),
        };
        let json = serde_json::to_vec(&payload).expect("board code serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{CODE_HEADER}:{}:{encoded}", self.size)
    }

    /// Decodes a board from the provided string representation.
    ///
    /// Only the encoding is checked here. Whether the tiles form a legal,
    /// solvable arrangement is decided by the world when the board is loaded.
    pub(crate) fn decode(value: &str) -> Result<Self, BoardTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BoardTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(BoardTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(BoardTransferError::MissingVersion)?;
        let size = parts.next().ok_or(BoardTransferError::MissingSize)?;
        let payload = parts.next().ok_or(BoardTransferError::MissingPayload)?;

        if domain != CODE_DOMAIN {
            return Err(BoardTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != CODE_VERSION {
            return Err(BoardTransferError::UnsupportedVersion(version.to_owned()));
        }

        let size = parse_size(size)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(BoardTransferError::InvalidEncoding)?;
        let decoded: SerializableBoard =
            serde_json::from_slice(&bytes).map_err(BoardTransferError::InvalidPayload)?;

        Ok(Self {
            size,
            tiles: decoded.tiles.into_iter().map(Tile::new).collect(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializableBoard {
    tiles: Vec<u32>,
}

/// Errors that can occur while decoding board codes.
#[derive(Debug)]
pub(crate) enum BoardTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the code.
    MissingPrefix,
    /// The code did not contain a version segment.
    MissingVersion,
    /// The code did not include the grid size.
    MissingSize,
    /// The code did not include the payload segment.
    MissingPayload,
    /// The code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid size could not be parsed or is not playable.
    InvalidSize(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for BoardTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "board code was empty"),
            Self::MissingPrefix => write!(f, "board code is missing the prefix"),
            Self::MissingVersion => write!(f, "board code is missing the version"),
            Self::MissingSize => write!(f, "board code is missing the grid size"),
            Self::MissingPayload => write!(f, "board code is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "board prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "board code version '{version}' is not supported")
            }
            Self::InvalidSize(size) => write!(f, "could not parse grid size '{size}'"),
            Self::InvalidEncoding(error) => write!(f, "could not decode board payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "could not parse board payload: {error}"),
        }
    }
}

impl Error for BoardTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_size(size: &str) -> Result<GridSize, BoardTransferError> {
    let invalid = || BoardTransferError::InvalidSize(size.to_owned());
    let (columns, rows) = size.split_once(['x', 'X']).ok_or_else(invalid)?;

    let columns = columns.trim().parse::<u32>().map_err(|_| invalid())?;
    let rows = rows.trim().parse::<u32>().map_err(|_| invalid())?;
    if columns != rows {
        return Err(invalid());
    }

    GridSize::new(columns).ok_or_else(invalid)
}
