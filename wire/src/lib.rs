//! Wire model for the realtime board channel.
//!
//! This crate owns the JSON representation exchanged with the game server:
//! the inbound board-update message (`GU` / `Gt` / `Es` / `Ps`) and the
//! outbound select intent (`Act.G`). Both `board` and `cli` decode through it.
//!
//! Inbound batches are decoded leniently. A malformed element inside `Es` or
//! `Ps` is reported in [`BoardUpdate::rejected`] and skipped; the rest of the
//! batch survives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned entity identifier.
pub type EntityId = u64;

/// Server-assigned player identifier.
pub type PlayerId = u64;

/// Error returned while decoding inbound payloads or encoding outbound ones.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The payload is not valid JSON or does not match the expected shape.
    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload is JSON but not an object.
    #[error("payload is not a JSON object")]
    NotAnObject,
    /// A required field is absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// The `St` integer does not map to a known status.
    #[error("unknown status code: {0}")]
    UnknownStatus(i64),
    /// The `T` integer does not map to a known entity kind.
    #[error("unknown entity kind: {0}")]
    UnknownKind(i64),
}

/// Lifecycle status carried by an entity update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityStatus {
    Added,
    Present,
    Selected,
    Removed,
}

impl EntityStatus {
    /// Parse a status from its wire integer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownStatus`] for codes outside `0..=3`.
    pub fn from_code(code: i64) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::Added),
            1 => Ok(Self::Present),
            2 => Ok(Self::Selected),
            3 => Ok(Self::Removed),
            other => Err(CodecError::UnknownStatus(other)),
        }
    }

    /// Wire integer for this status.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Added => 0,
            Self::Present => 1,
            Self::Selected => 2,
            Self::Removed => 3,
        }
    }
}

/// Lifecycle status carried by a player update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerStatus {
    Added,
    Present,
    Updated,
    Removed,
}

impl PlayerStatus {
    /// Parse a status from its wire integer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownStatus`] for codes outside `0..=3`.
    pub fn from_code(code: i64) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::Added),
            1 => Ok(Self::Present),
            2 => Ok(Self::Updated),
            3 => Ok(Self::Removed),
            other => Err(CodecError::UnknownStatus(other)),
        }
    }

    /// Wire integer for this status.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Added => 0,
            Self::Present => 1,
            Self::Updated => 2,
            Self::Removed => 3,
        }
    }
}

/// The kind of an entity on the board.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A solid colored block occupying one cell.
    #[default]
    Block,
}

impl EntityKind {
    /// Parse a kind from its wire integer.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownKind`] for unrecognized codes.
    pub fn from_code(code: i64) -> Result<Self, CodecError> {
        match code {
            0 => Ok(Self::Block),
            other => Err(CodecError::UnknownKind(other)),
        }
    }
}

/// Logical grid dimensions announced by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoardType {
    pub rows: u32,
    pub cols: u32,
}

/// One element of an `Es` batch.
///
/// Only `id` and `status` are always required. Cell coordinates are optional
/// on the wire because removals carry only the id; the engine decides whether
/// a given update needs them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityUpdate {
    pub id: EntityId,
    pub status: EntityStatus,
    pub kind: EntityKind,
    pub grid_x: Option<i32>,
    pub grid_y: Option<i32>,
    pub color_class: u32,
}

/// One element of a `Ps` batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerUpdate {
    pub id: PlayerId,
    pub status: PlayerStatus,
    pub name: Option<String>,
    pub score: Option<i64>,
}

/// Which inbound batch a rejected element came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Entity,
    Player,
}

/// A batch element that failed to decode and was skipped.
#[derive(Debug)]
pub struct Rejected {
    pub category: Category,
    /// Position of the element within its batch.
    pub index: usize,
    pub error: CodecError,
}

/// A decoded inbound board-update message.
///
/// `None` categories mean "no change in this batch", never "clear all".
#[derive(Debug, Default)]
pub struct BoardUpdate {
    pub board_type: Option<BoardType>,
    pub entities: Option<Vec<EntityUpdate>>,
    pub players: Option<Vec<PlayerUpdate>>,
    pub rejected: Vec<Rejected>,
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(rename = "GU", default)]
    board_update: Option<Value>,
    #[serde(rename = "Gt", default)]
    board_type: Option<Value>,
    #[serde(rename = "Es", default)]
    entities: Option<Vec<Value>>,
    #[serde(rename = "Ps", default)]
    players: Option<Vec<Value>>,
}

#[derive(Deserialize)]
struct RawBoardType {
    #[serde(rename = "R")]
    rows: i64,
    #[serde(rename = "C")]
    cols: i64,
}

#[derive(Deserialize)]
struct RawEntity {
    #[serde(rename = "Id")]
    id: Option<EntityId>,
    #[serde(rename = "T")]
    kind: Option<i64>,
    #[serde(rename = "X")]
    x: Option<i32>,
    #[serde(rename = "Y")]
    y: Option<i32>,
    #[serde(rename = "C")]
    color: Option<u32>,
    #[serde(rename = "St")]
    status: Option<i64>,
}

#[derive(Deserialize)]
struct RawPlayer {
    #[serde(rename = "Id")]
    id: Option<PlayerId>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Score")]
    score: Option<i64>,
    #[serde(rename = "St")]
    status: Option<i64>,
}

impl TryFrom<RawEntity> for EntityUpdate {
    type Error = CodecError;

    fn try_from(raw: RawEntity) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(CodecError::MissingField("Id"))?;
        let status = EntityStatus::from_code(raw.status.ok_or(CodecError::MissingField("St"))?)?;
        let kind = raw.kind.map_or(Ok(EntityKind::Block), EntityKind::from_code)?;
        Ok(Self {
            id,
            status,
            kind,
            grid_x: raw.x,
            grid_y: raw.y,
            color_class: raw.color.unwrap_or(0),
        })
    }
}

impl TryFrom<RawPlayer> for PlayerUpdate {
    type Error = CodecError;

    fn try_from(raw: RawPlayer) -> Result<Self, Self::Error> {
        let id = raw.id.ok_or(CodecError::MissingField("Id"))?;
        let status = PlayerStatus::from_code(raw.status.ok_or(CodecError::MissingField("St"))?)?;
        Ok(Self { id, status, name: raw.name, score: raw.score })
    }
}

/// Decode a raw inbound text payload.
///
/// Returns `Ok(None)` when the message is not flagged as a board update
/// (`GU` absent or falsy).
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed JSON and
/// [`CodecError::NotAnObject`] for non-object payloads. Element-level failures
/// never fail the call; they land in [`BoardUpdate::rejected`].
pub fn decode_inbound(text: &str) -> Result<Option<BoardUpdate>, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(CodecError::NotAnObject);
    }
    let raw: RawMessage = serde_json::from_value(value)?;
    if !raw.board_update.as_ref().is_some_and(is_truthy) {
        return Ok(None);
    }

    let mut update = BoardUpdate {
        board_type: raw.board_type.and_then(decode_board_type),
        ..BoardUpdate::default()
    };

    if let Some(items) = raw.entities {
        let mut entities = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match decode_element::<RawEntity, EntityUpdate>(item) {
                Ok(entity) => entities.push(entity),
                Err(error) => update.rejected.push(Rejected { category: Category::Entity, index, error }),
            }
        }
        update.entities = Some(entities);
    }

    if let Some(items) = raw.players {
        let mut players = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match decode_element::<RawPlayer, PlayerUpdate>(item) {
                Ok(player) => players.push(player),
                Err(error) => update.rejected.push(Rejected { category: Category::Player, index, error }),
            }
        }
        update.players = Some(players);
    }

    Ok(Some(update))
}

fn decode_element<R, T>(item: Value) -> Result<T, CodecError>
where
    R: for<'de> Deserialize<'de>,
    T: TryFrom<R, Error = CodecError>,
{
    let raw: R = serde_json::from_value(item)?;
    T::try_from(raw)
}

/// Non-positive dimensions are treated as "no board type in this message".
fn decode_board_type(value: Value) -> Option<BoardType> {
    let raw: RawBoardType = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(error) => {
            log::warn!("ignoring malformed board type: {error}");
            return None;
        }
    };
    match (u32::try_from(raw.rows), u32::try_from(raw.cols)) {
        (Ok(rows), Ok(cols)) if rows > 0 && cols > 0 => Some(BoardType { rows, cols }),
        _ => {
            log::warn!("ignoring board type {}x{}", raw.rows, raw.cols);
            None
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// =============================================================
// Outbound
// =============================================================

/// Game command codes understood by the server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum GameCommandKind {
    /// Toggle selection of an entity. The server decides the final state.
    SelectEntity,
}

impl From<GameCommandKind> for u8 {
    fn from(kind: GameCommandKind) -> Self {
        match kind {
            GameCommandKind::SelectEntity => 0,
        }
    }
}

impl TryFrom<u8> for GameCommandKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::SelectEntity),
            other => Err(format!("unknown game command: {other}")),
        }
    }
}

/// `Act.G`: a game command addressed at one entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCommand {
    #[serde(rename = "C")]
    pub command: GameCommandKind,
    #[serde(rename = "E")]
    pub entity_id: EntityId,
}

/// `Act`: the player action envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerAction {
    #[serde(rename = "G")]
    pub game: GameCommand,
}

/// An outbound client → server message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMessage {
    #[serde(rename = "Act")]
    pub act: PlayerAction,
}

impl ActionMessage {
    /// Build the select intent for `entity_id`.
    #[must_use]
    pub fn select(entity_id: EntityId) -> Self {
        Self {
            act: PlayerAction {
                game: GameCommand { command: GameCommandKind::SelectEntity, entity_id },
            },
        }
    }
}

/// Serialize an outbound message to its JSON text form.
///
/// # Errors
///
/// Returns [`CodecError::Json`] if serialization fails.
pub fn encode_action(message: &ActionMessage) -> Result<String, CodecError> {
    Ok(serde_json::to_string(message)?)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
