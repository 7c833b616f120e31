//! Push notifications for a game's reviews.
//!
//! The server publishes two events on the `game-{id}` channel:
//!
//! - `ai-review` with `{ai_review_id?, refresh?}`: a review was created or
//!   finished, or the list changed.
//! - `ai-review-key` with `{key, body}`: one key of the open review changed.
//!   `key` is `metadata` or `move-N`, in which case `body` is the new
//!   analysis for move `N`.
//!
//! Transports (a websocket bridge, the refresh timer, a key binding) feed
//! raw `(event, payload)` pairs into a [`PushSender`]; the host consumes the
//! parsed events from the matching [`PushStream`].

use review::MoveAnalysis;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

use crate::error::{ClientError, ClientResult};

pub const REVIEW_EVENT: &str = "ai-review";
pub const REVIEW_KEY_EVENT: &str = "ai-review-key";

/// Channel name the events for `game_id` are published on.
pub fn channel_name(game_id: u64) -> String {
    format!("game-{game_id}")
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushEvent {
    /// Re-fetch the named review and/or the review list.
    ReviewUpdated {
        ai_review_id: Option<String>,
        refresh: bool,
    },
    /// Replace one move's analysis in the open review.
    MoveUpdated {
        move_number: u32,
        analysis: MoveAnalysis,
    },
    /// Review metadata changed.
    MetadataUpdated(serde_json::Value),
}

#[derive(Deserialize)]
struct ReviewPayload {
    #[serde(default, deserialize_with = "deserialize_id")]
    ai_review_id: Option<String>,
}

#[derive(Deserialize)]
struct KeyPayload {
    key: String,
    #[serde(default)]
    body: serde_json::Value,
}

// Review ids arrive as strings or numbers depending on the server version.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

impl PushEvent {
    /// Parse a raw push message.
    ///
    /// Returns `Ok(None)` for events and keys this client does not handle.
    pub fn from_message(event: &str, payload: &serde_json::Value) -> ClientResult<Option<Self>> {
        match event {
            REVIEW_EVENT => {
                // `refresh` counts by presence, whatever its value
                let refresh = payload.get("refresh").is_some();
                let parsed = ReviewPayload::deserialize(payload)?;
                if parsed.ai_review_id.is_none() && !refresh {
                    return Ok(None);
                }
                Ok(Some(Self::ReviewUpdated {
                    ai_review_id: parsed.ai_review_id,
                    refresh,
                }))
            }
            REVIEW_KEY_EVENT => {
                let payload = KeyPayload::deserialize(payload)?;
                if payload.key == "metadata" {
                    return Ok(Some(Self::MetadataUpdated(payload.body)));
                }
                let Some(move_number) = parse_move_key(&payload.key) else {
                    debug!(key = %payload.key, "ignoring unknown review key");
                    return Ok(None);
                };
                let mut analysis = MoveAnalysis::deserialize(&payload.body)?;
                if analysis.move_number != move_number {
                    return Err(ClientError::InvalidData(format!(
                        "key {} carries analysis for move {}",
                        payload.key, analysis.move_number
                    )));
                }
                analysis.post_move_win_rate = None;
                Ok(Some(Self::MoveUpdated {
                    move_number,
                    analysis,
                }))
            }
            _ => Ok(None),
        }
    }

    /// The event injected by the refresh timer and the manual refresh key.
    pub fn refresh() -> Self {
        Self::ReviewUpdated {
            ai_review_id: None,
            refresh: true,
        }
    }
}

fn parse_move_key(key: &str) -> Option<u32> {
    let digits = key.strip_prefix("move-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Sending half of a push channel
#[derive(Debug, Clone)]
pub struct PushSender {
    tx: mpsc::UnboundedSender<PushEvent>,
}

/// Receiving half of a push channel
pub type PushStream = UnboundedReceiverStream<PushEvent>;

/// Create a connected sender/stream pair.
pub fn channel() -> (PushSender, PushStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (PushSender { tx }, UnboundedReceiverStream::new(rx))
}

impl PushSender {
    pub fn send(&self, event: PushEvent) -> ClientResult<()> {
        self.tx.send(event).map_err(|_| ClientError::ChannelClosed)
    }

    /// Parse and forward a raw message. Returns whether an event was sent.
    pub fn send_message(&self, event: &str, payload: &serde_json::Value) -> ClientResult<bool> {
        match PushEvent::from_message(event, payload)? {
            Some(parsed) => {
                self.send(parsed)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_stream::StreamExt;

    #[test]
    fn review_event_with_id_and_refresh() {
        let event = PushEvent::from_message(
            REVIEW_EVENT,
            &json!({"ai_review_id": "abc", "refresh": false}),
        )
        .unwrap();
        assert_eq!(
            event,
            Some(PushEvent::ReviewUpdated {
                ai_review_id: Some("abc".into()),
                refresh: true,
            })
        );
    }

    #[test]
    fn numeric_review_id_becomes_string() {
        let event = PushEvent::from_message(REVIEW_EVENT, &json!({"ai_review_id": 17})).unwrap();
        assert_eq!(
            event,
            Some(PushEvent::ReviewUpdated {
                ai_review_id: Some("17".into()),
                refresh: false,
            })
        );
    }

    #[test]
    fn empty_review_event_is_ignored() {
        assert_eq!(PushEvent::from_message(REVIEW_EVENT, &json!({})).unwrap(), None);
    }

    #[test]
    fn move_key_event_parses_analysis() {
        let payload = json!({
            "key": "move-12",
            "body": {"move_number": 12, "move": {"x": 3, "y": 3}, "pre_move_win_rate": 0.42}
        });
        match PushEvent::from_message(REVIEW_KEY_EVENT, &payload).unwrap() {
            Some(PushEvent::MoveUpdated {
                move_number,
                analysis,
            }) => {
                assert_eq!(move_number, 12);
                assert_eq!(analysis.pre_move_win_rate, 0.42);
                assert!(analysis.variations.is_empty());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn mismatched_move_key_is_rejected() {
        let payload = json!({
            "key": "move-3",
            "body": {"move_number": 4, "pre_move_win_rate": 0.5}
        });
        let err = PushEvent::from_message(REVIEW_KEY_EVENT, &payload).unwrap_err();
        assert!(matches!(err, ClientError::InvalidData(_)));
    }

    #[test]
    fn metadata_and_unknown_keys() {
        let metadata =
            PushEvent::from_message(REVIEW_KEY_EVENT, &json!({"key": "metadata", "body": {}}))
                .unwrap();
        assert!(matches!(metadata, Some(PushEvent::MetadataUpdated(_))));

        for key in ["moves", "move-", "move-x1", "other"] {
            let parsed =
                PushEvent::from_message(REVIEW_KEY_EVENT, &json!({"key": key, "body": {}})).unwrap();
            assert_eq!(parsed, None, "key {key}");
        }
    }

    #[test]
    fn unknown_event_is_ignored() {
        assert_eq!(PushEvent::from_message("chat", &json!({})).unwrap(), None);
    }

    #[test]
    fn channel_name_is_scoped_to_game() {
        assert_eq!(channel_name(991), "game-991");
    }

    #[tokio::test]
    async fn sender_forwards_parsed_events() {
        let (tx, mut rx) = channel();
        assert!(tx.send_message(REVIEW_EVENT, &json!({"refresh": 1})).unwrap());
        assert!(!tx.send_message("chat", &json!({})).unwrap());
        drop(tx);

        assert_eq!(rx.next().await, Some(PushEvent::refresh()));
        assert_eq!(rx.next().await, None);
    }

    #[test]
    fn send_after_close_fails() {
        let (tx, rx) = channel();
        drop(rx);
        assert!(tx.is_closed());
        assert!(matches!(
            tx.send(PushEvent::refresh()),
            Err(ClientError::ChannelClosed)
        ));
    }
}
