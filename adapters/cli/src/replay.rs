#![allow(clippy::missing_errors_doc)]

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use gateclash_core::Coord;
use serde::{Deserialize, Serialize};

const REPLAY_DOMAIN: &str = "gateclash";
const REPLAY_VERSION: &str = "v1";

/// Identifier prefix emitted before the seed and the encoded move payload.
pub(crate) const REPLAY_HEADER: &str = "gateclash:v1";
/// Delimiter used to separate the prefix, seed, and payload segments.
const FIELD_DELIMITER: char = ':';

/// Replayable record of one battle: the seed and every applied player move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BattleReplay {
    /// Seed the battle was started from.
    pub seed: u64,
    /// Player moves in the order they were applied.
    pub moves: Vec<RecordedMove>,
}

/// Single recorded player move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct RecordedMove {
    /// Front cell the moved unit started from.
    pub from: Coord,
    /// Column the unit was sent to.
    pub to_column: i32,
}

impl BattleReplay {
    /// Encodes the replay into a single-line string suitable for pasting.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let payload = SerializableMoves {
            moves: self.moves.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("replay serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{REPLAY_HEADER}:{}:{encoded}", self.seed)
    }

    /// Decodes a replay from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ReplayError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ReplayError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ReplayError::MissingPrefix)?;
        let version = parts.next().ok_or(ReplayError::MissingVersion)?;
        let seed = parts.next().ok_or(ReplayError::MissingSeed)?;
        let payload = parts.next().ok_or(ReplayError::MissingPayload)?;

        if domain != REPLAY_DOMAIN {
            return Err(ReplayError::InvalidPrefix(domain.to_owned()));
        }
        if version != REPLAY_VERSION {
            return Err(ReplayError::UnsupportedVersion(version.to_owned()));
        }

        let seed = seed
            .trim()
            .parse::<u64>()
            .map_err(|_| ReplayError::InvalidSeed(seed.to_owned()))?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(ReplayError::InvalidEncoding)?;
        let decoded: SerializableMoves =
            serde_json::from_slice(&bytes).map_err(ReplayError::InvalidPayload)?;

        Ok(Self {
            seed,
            moves: decoded.moves,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct SerializableMoves {
    moves: Vec<RecordedMove>,
}

/// Errors that can occur while decoding replay transfer strings.
#[derive(Debug)]
pub(crate) enum ReplayError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the encoded replay.
    MissingPrefix,
    /// The encoded replay did not contain a version segment.
    MissingVersion,
    /// The encoded replay did not include the battle seed.
    MissingSeed,
    /// The encoded replay did not include the payload segment.
    MissingPayload,
    /// The encoded replay used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The encoded replay used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The seed segment could not be parsed as a 64-bit integer.
    InvalidSeed(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The decoded payload could not be deserialised.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "replay string was empty"),
            Self::MissingPrefix => write!(f, "replay string is missing the prefix"),
            Self::MissingVersion => write!(f, "replay string is missing the version"),
            Self::MissingSeed => write!(f, "replay string is missing the battle seed"),
            Self::MissingPayload => write!(f, "replay string is missing the payload"),
            Self::InvalidPrefix(prefix) => write!(f, "replay prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "replay version '{version}' is not supported")
            }
            Self::InvalidSeed(seed) => write!(f, "could not parse battle seed '{seed}'"),
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode replay payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse replay payload: {error}")
            }
        }
    }
}

impl Error for ReplayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}
