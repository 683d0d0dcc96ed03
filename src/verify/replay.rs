//! Nonce replay cache shared by concurrent verifications.

// self
use crate::{
	_prelude::*,
	signing::{Nonce, Timestamp},
};

/// Result of recording a nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplayOutcome {
	/// First sighting inside the window; the nonce is now recorded.
	Fresh,
	/// The nonce is still remembered from an earlier request.
	Replayed,
	/// The cache is full and refused to record the nonce.
	CapacityExhausted,
}

/// Replay cache contract.
///
/// Implementations must make the existence check and the insertion one atomic step; two
/// concurrent callers presenting the same nonce must never both observe
/// [`ReplayOutcome::Fresh`].
pub trait ReplayGuard
where
	Self: Send + Sync,
{
	/// Records `nonce` until `expires_at`, evicting entries that expired before `now`.
	fn check_and_record(
		&self,
		nonce: &Nonce,
		expires_at: Timestamp,
		now: Timestamp,
	) -> ReplayOutcome;
}

#[derive(Debug, Default)]
struct ReplayState {
	seen: HashMap<Nonce, Timestamp>,
	expiry: BTreeSet<(Timestamp, Nonce)>,
}
impl ReplayState {
	fn evict_expired(&mut self, now: Timestamp) {
		while let Some(&(expires_at, _)) = self.expiry.first() {
			if expires_at >= now {
				break;
			}
			if let Some((_, nonce)) = self.expiry.pop_first() {
				self.seen.remove(&nonce);
			}
		}
	}
}

/// In-process replay cache guarded by a single mutex.
///
/// Each entry lives until the request timestamp leaves the tolerance window; after that the
/// clock-skew check rejects the request on its own. Cloning shares the underlying cache.
#[derive(Clone, Debug, Default)]
pub struct MemoryReplayCache {
	state: Arc<Mutex<ReplayState>>,
	capacity: Option<usize>,
}
impl MemoryReplayCache {
	/// Bounds the number of live entries; once full, new nonces are refused.
	pub fn with_capacity_limit(capacity: usize) -> Self {
		Self { state: Default::default(), capacity: Some(capacity) }
	}

	/// Number of nonces currently remembered.
	pub fn len(&self) -> usize {
		self.state.lock().seen.len()
	}

	/// Returns true when no nonce is remembered.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops every entry that expired before `now`.
	pub fn purge(&self, now: Timestamp) {
		self.state.lock().evict_expired(now);
	}
}
impl ReplayGuard for MemoryReplayCache {
	fn check_and_record(
		&self,
		nonce: &Nonce,
		expires_at: Timestamp,
		now: Timestamp,
	) -> ReplayOutcome {
		let mut state = self.state.lock();

		state.evict_expired(now);

		if state.seen.contains_key(nonce) {
			return ReplayOutcome::Replayed;
		}
		if self.capacity.is_some_and(|cap| state.seen.len() >= cap) {
			return ReplayOutcome::CapacityExhausted;
		}

		state.seen.insert(nonce.clone(), expires_at);
		state.expiry.insert((expires_at, nonce.clone()));

		ReplayOutcome::Fresh
	}
}
