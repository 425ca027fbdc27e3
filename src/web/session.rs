//! # Sessões de Diálogo
//!
//! Guarda o [`DialogueState`] de cada conversa entre requisições. A sessão
//! é identificada por um UUID que o cliente devolve em cada `/chat`.
//!
//! Sessões paradas por mais que o TTL voltam ao estado inicial: quem
//! abandonou a conversa no meio de "qual sabor?" não fica preso nela.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::orchestrator::DialogueState;

struct SessionEntry {
    state: DialogueState,
    last_seen: DateTime<Utc>,
}

/// Armazém em memória de estados de diálogo, com expiração por inatividade.
pub struct SessionStore {
    entries: Mutex<HashMap<Uuid, SessionEntry>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Estado atual da sessão; desconhecida ou expirada → `Idle`.
    pub fn state(&self, id: Uuid) -> DialogueState {
        self.state_at(id, Utc::now())
    }

    pub fn save(&self, id: Uuid, state: DialogueState) {
        self.save_at(id, state, Utc::now());
    }

    /// Remove a sessão. Retorna `true` se ela existia.
    pub fn reset(&self, id: Uuid) -> bool {
        self.entries.lock().remove(&id).is_some()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn state_at(&self, id: Uuid, now: DateTime<Utc>) -> DialogueState {
        let entries = self.entries.lock();
        match entries.get(&id) {
            Some(entry) if now - entry.last_seen <= self.ttl => entry.state,
            _ => DialogueState::Idle,
        }
    }

    fn save_at(&self, id: Uuid, state: DialogueState, now: DateTime<Utc>) {
        let mut entries = self.entries.lock();
        let ttl = self.ttl;
        entries.retain(|_, e| now - e.last_seen <= ttl);
        entries.insert(id, SessionEntry { state, last_seen: now });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::minutes(30))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_session_starts_idle() {
        let store = SessionStore::default();
        assert_eq!(store.state(Uuid::new_v4()), DialogueState::Idle);
        assert!(store.is_empty());
    }

    #[test]
    fn saved_state_is_returned() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        store.save(id, DialogueState::AwaitingDish);
        assert_eq!(store.state(id), DialogueState::AwaitingDish);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn sessions_are_independent() {
        let store = SessionStore::default();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        store.save(a, DialogueState::AwaitingDish);
        assert_eq!(store.state(b), DialogueState::Idle);
    }

    #[test]
    fn expired_session_falls_back_to_idle() {
        let store = SessionStore::new(Duration::minutes(10));
        let id = Uuid::new_v4();
        let t0 = Utc::now();
        store.save_at(id, DialogueState::AwaitingDish, t0);
        assert_eq!(store.state_at(id, t0 + Duration::minutes(5)), DialogueState::AwaitingDish);
        assert_eq!(store.state_at(id, t0 + Duration::minutes(11)), DialogueState::Idle);
    }

    #[test]
    fn saving_evicts_expired_sessions() {
        let store = SessionStore::new(Duration::minutes(10));
        let t0 = Utc::now();
        store.save_at(Uuid::new_v4(), DialogueState::AwaitingDish, t0);
        store.save_at(Uuid::new_v4(), DialogueState::Idle, t0 + Duration::minutes(20));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn reset_forgets_the_session() {
        let store = SessionStore::default();
        let id = Uuid::new_v4();
        store.save(id, DialogueState::AwaitingDish);
        assert!(store.reset(id));
        assert!(!store.reset(id));
        assert_eq!(store.state(id), DialogueState::Idle);
    }
}
