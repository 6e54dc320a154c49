//! Server-side chat sessions with capped history

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One question/answer exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    /// The user's question
    pub question: String,
    /// The generated answer
    pub answer: String,
    /// When the question was asked
    pub asked_at: DateTime<Utc>,
}

/// A chat session against one topic
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Session ID
    pub id: Uuid,
    /// Topic the session is about
    pub topic_key: String,
    /// Question/answer history, oldest first
    pub turns: Vec<ChatTurn>,
    /// When the session started
    pub created_at: DateTime<Utc>,
}

/// In-memory session store
pub struct SessionStore {
    sessions: DashMap<Uuid, ChatSession>,
    max_turns: usize,
}

impl SessionStore {
    /// Create a new store; history per session is capped at `max_turns`
    pub fn new(max_turns: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            max_turns,
        }
    }

    /// Record a question/answer pair, creating the session when needed.
    /// Returns the session ID.
    pub fn record_turn(
        &self,
        session_id: Option<Uuid>,
        topic_key: &str,
        question: &str,
        answer: &str,
    ) -> Uuid {
        let id = session_id.unwrap_or_else(Uuid::new_v4);

        let mut session = self.sessions.entry(id).or_insert_with(|| ChatSession {
            id,
            topic_key: topic_key.to_string(),
            turns: Vec::new(),
            created_at: Utc::now(),
        });

        // A session follows the most recently queried topic
        session.topic_key = topic_key.to_string();
        session.turns.push(ChatTurn {
            question: question.to_string(),
            answer: answer.to_string(),
            asked_at: Utc::now(),
        });

        if session.turns.len() > self.max_turns {
            let excess = session.turns.len() - self.max_turns;
            session.turns.drain(0..excess);
        }

        id
    }

    /// Get a session by ID
    pub fn get(&self, id: &Uuid) -> Option<ChatSession> {
        self.sessions.get(id).map(|s| s.clone())
    }

    /// Delete a session; returns whether it existed
    pub fn delete(&self, id: &Uuid) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Number of active sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if there are no sessions
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_creates_session() {
        let store = SessionStore::new(50);
        let id = store.record_turn(None, "fees", "What is the fee?", "50000");

        let session = store.get(&id).unwrap();
        assert_eq!(session.topic_key, "fees");
        assert_eq!(session.turns.len(), 1);
        assert_eq!(session.turns[0].question, "What is the fee?");
    }

    #[test]
    fn test_record_appends_to_existing_session() {
        let store = SessionStore::new(50);
        let id = store.record_turn(None, "fees", "q1", "a1");
        let same = store.record_turn(Some(id), "fees", "q2", "a2");

        assert_eq!(id, same);
        assert_eq!(store.get(&id).unwrap().turns.len(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_history_capped() {
        let store = SessionStore::new(3);
        let id = store.record_turn(None, "fees", "q0", "a0");
        for i in 1..6 {
            store.record_turn(Some(id), "fees", &format!("q{i}"), "a");
        }

        let session = store.get(&id).unwrap();
        assert_eq!(session.turns.len(), 3);
        // Oldest turns were dropped
        assert_eq!(session.turns[0].question, "q3");
    }

    #[test]
    fn test_topic_follows_latest_query() {
        let store = SessionStore::new(50);
        let id = store.record_turn(None, "fees", "q1", "a1");
        store.record_turn(Some(id), "cutoffs", "q2", "a2");

        assert_eq!(store.get(&id).unwrap().topic_key, "cutoffs");
    }

    #[test]
    fn test_delete_session() {
        let store = SessionStore::new(50);
        let id = store.record_turn(None, "fees", "q", "a");

        assert!(store.delete(&id));
        assert!(!store.delete(&id));
        assert!(store.get(&id).is_none());
    }
}
