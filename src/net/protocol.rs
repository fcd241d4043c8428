//! Wire protocol between the host and its clients.
//!
//! Every message is a JSON object `{type, payload, fromIndex}`. Host-bound
//! messages carry intents; client-bound messages carry full view
//! replacements. Payload shape depends on `type`:
//!
//! | type              | direction      | payload          |
//! |-------------------|----------------|------------------|
//! | `UPDATE_STATE`    | host → client  | `GameView`       |
//! | `START_GAME`      | host → client  | none             |
//! | `ACTION_DRAW`     | client → host  | none             |
//! | `ACTION_END_TURN` | client → host  | none             |
//! | `ACTION_MOVE`     | client → host  | `MovePayload`    |

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::action::Intent;
use crate::core::seat::{Seat, SeatMap};
use crate::core::state::GameState;
use crate::error::ProtocolError;
use crate::tiles::{Tile, TileId};

use super::view::GameView;

/// Discriminant of a wire message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    UpdateState,
    ActionDraw,
    ActionMove,
    ActionEndTurn,
    StartGame,
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MessageType::UpdateState => "UPDATE_STATE",
            MessageType::ActionDraw => "ACTION_DRAW",
            MessageType::ActionMove => "ACTION_MOVE",
            MessageType::ActionEndTurn => "ACTION_END_TURN",
            MessageType::StartGame => "START_GAME",
        };
        write!(f, "{}", label)
    }
}

/// One message on a peer channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMessage {
    #[serde(rename = "type")]
    pub kind: MessageType,
    #[serde(default)]
    pub payload: Value,
    pub from_index: u8,
}

/// The client's proposed board and hand after a commit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovePayload {
    pub board: Vec<Vec<Tile>>,
    pub hand: Vec<Tile>,
    /// Echoed by clients; the host computes meld flags itself.
    pub has_meld: SeatMap<bool>,
}

/// A decoded host-bound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostBound {
    Draw,
    Move(MovePayload),
    EndTurn,
}

/// A decoded client-bound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientBound {
    UpdateState(Box<GameView>),
    StartGame,
}

impl WireMessage {
    fn bare(kind: MessageType, from: Seat) -> Self {
        Self {
            kind,
            payload: Value::Null,
            from_index: from.into(),
        }
    }

    pub fn draw(from: Seat) -> Self {
        Self::bare(MessageType::ActionDraw, from)
    }

    pub fn end_turn(from: Seat) -> Self {
        Self::bare(MessageType::ActionEndTurn, from)
    }

    pub fn start_game() -> Self {
        Self::bare(MessageType::StartGame, Seat::HOST)
    }

    /// # Errors
    ///
    /// Fails only if the payload cannot be represented as JSON.
    pub fn action_move(from: Seat, payload: &MovePayload) -> Result<Self, ProtocolError> {
        Ok(Self {
            kind: MessageType::ActionMove,
            payload: serde_json::to_value(payload)?,
            from_index: from.into(),
        })
    }

    /// # Errors
    ///
    /// Fails only if the view cannot be represented as JSON.
    pub fn update_state(view: &GameView) -> Result<Self, ProtocolError> {
        Ok(Self {
            kind: MessageType::UpdateState,
            payload: serde_json::to_value(view)?,
            from_index: Seat::HOST.into(),
        })
    }

    /// Serialize to the JSON text sent on the channel.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Json` if serialization fails.
    pub fn encode(&self) -> Result<String, ProtocolError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse JSON text received from a channel.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::Json` on malformed text or unknown types.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(text)?)
    }

    fn require_empty(&self) -> Result<(), ProtocolError> {
        if self.payload.is_null() {
            Ok(())
        } else {
            Err(ProtocolError::UnexpectedPayload { kind: self.kind })
        }
    }

    fn require_payload<T: serde::de::DeserializeOwned>(self) -> Result<T, ProtocolError> {
        if self.payload.is_null() {
            return Err(ProtocolError::MissingPayload { kind: self.kind });
        }
        Ok(serde_json::from_value(self.payload)?)
    }

    /// Interpret a message received by the host from `assigned`.
    ///
    /// # Errors
    ///
    /// Rejects client-bound types, a `fromIndex` other than the peer's seat,
    /// and payloads that do not match the type.
    pub fn into_host_bound(self, assigned: Seat) -> Result<HostBound, ProtocolError> {
        if self.from_index != u8::from(assigned) {
            return Err(ProtocolError::SeatMismatch {
                declared: self.from_index,
                assigned,
            });
        }

        match self.kind {
            MessageType::ActionDraw => self.require_empty().map(|()| HostBound::Draw),
            MessageType::ActionEndTurn => self.require_empty().map(|()| HostBound::EndTurn),
            MessageType::ActionMove => self.require_payload().map(HostBound::Move),
            kind @ (MessageType::UpdateState | MessageType::StartGame) => {
                Err(ProtocolError::UnexpectedMessage { kind })
            }
        }
    }

    /// Interpret a message received by a client.
    ///
    /// # Errors
    ///
    /// Rejects host-bound types and payloads that do not match the type.
    pub fn into_client_bound(self) -> Result<ClientBound, ProtocolError> {
        match self.kind {
            MessageType::UpdateState => self
                .require_payload()
                .map(|view| ClientBound::UpdateState(Box::new(view))),
            MessageType::StartGame => Ok(ClientBound::StartGame),
            kind => Err(ProtocolError::UnexpectedMessage { kind }),
        }
    }
}

fn id_set(tiles: &[Tile]) -> FxHashSet<TileId> {
    tiles.iter().map(|t| t.id).collect()
}

impl MovePayload {
    /// Recover the single commit that turns the canonical board and `seat`'s
    /// hand into this payload.
    ///
    /// The proposal must either append exactly one set to an otherwise
    /// unchanged board, or grow exactly one existing set, and the tiles that
    /// left the hand must be exactly the tiles that reached the board. Tiles
    /// are matched by id; the faces the client sent are only checked for
    /// well-formedness. Legality of the resulting set is left to the engine.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::MalformedTile` or `ProtocolError::UndecodableMove`.
    pub fn to_intent(&self, state: &GameState, seat: Seat) -> Result<Intent, ProtocolError> {
        if let Some(bad) = self
            .hand
            .iter()
            .chain(self.board.iter().flatten())
            .find(|t| !t.is_well_formed())
        {
            return Err(ProtocolError::MalformedTile(bad.id));
        }

        let proposed_hand = id_set(&self.hand);
        if proposed_hand.len() != self.hand.len() {
            return Err(ProtocolError::UndecodableMove("hand repeats a tile"));
        }
        if proposed_hand.iter().any(|&id| !state.holds(seat, id)) {
            return Err(ProtocolError::UndecodableMove("hand gained tiles"));
        }

        let removed: FxHashSet<TileId> = state
            .hand(seat)
            .iter()
            .map(|t| t.id)
            .filter(|id| !proposed_hand.contains(id))
            .collect();
        if removed.is_empty() {
            return Err(ProtocolError::UndecodableMove("no tiles left the hand"));
        }

        let board = state.board();

        if self.board.len() == board.len() + 1 {
            let unchanged = board
                .iter()
                .zip(&self.board)
                .all(|(meld, proposed)| id_set(meld.tiles()) == id_set(proposed));
            if !unchanged {
                return Err(ProtocolError::UndecodableMove("existing sets changed"));
            }

            let appended = &self.board[board.len()];
            if appended.len() != removed.len() || id_set(appended) != removed {
                return Err(ProtocolError::UndecodableMove(
                    "new set does not match tiles that left the hand",
                ));
            }

            return Ok(Intent::commit_new(appended.iter().map(|t| t.id).collect()));
        }

        if self.board.len() != board.len() {
            return Err(ProtocolError::UndecodableMove(
                "board must gain one set or grow one set",
            ));
        }

        let mut changed = board
            .iter()
            .zip(&self.board)
            .enumerate()
            .filter(|(_, (meld, proposed))| id_set(meld.tiles()) != id_set(proposed));

        let (index, (meld, proposed)) = match (changed.next(), changed.next()) {
            (Some(only), None) => only,
            _ => return Err(ProtocolError::UndecodableMove("more than one set changed")),
        };

        let before = id_set(meld.tiles());
        let after = id_set(proposed);
        if after.len() != proposed.len() || !before.is_subset(&after) {
            return Err(ProtocolError::UndecodableMove("set lost tiles"));
        }

        let added: Vec<TileId> = proposed
            .iter()
            .map(|t| t.id)
            .filter(|id| !before.contains(id))
            .collect();
        if added.len() != removed.len() || !added.iter().all(|id| removed.contains(id)) {
            return Err(ProtocolError::UndecodableMove(
                "added tiles do not match tiles that left the hand",
            ));
        }

        Ok(Intent::extend(index, added))
    }
}
