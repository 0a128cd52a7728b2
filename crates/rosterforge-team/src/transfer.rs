//! The transfer protocol: moving a listed player between two teams.
//!
//! A transfer is the only operation that needs two team locks at once.
//! Both are always taken in ascending `TeamId` order, whichever team is
//! buying, so two opposite transfers between the same pair of teams can
//! never deadlock.
//!
//! ```text
//!  lock(min id) ─→ lock(max id)
//!       │
//!       ├─ 1. player on seller roster?        no → outcome error
//!       ├─ 2. player listed?                  no → outcome error
//!       ├─ 3. buyer balance ≥ price?          no → outcome error
//!       ├─ 4. move money
//!       ├─ 5. settle the player (appreciate, unlist)
//!       ├─ 6. move the player
//!       └─ 7. persist seller row, buyer row, player row
//! ```
//!
//! Steps 4 to 6 happen in memory before anything is written. A failed
//! write in step 7 is reported as an outcome error; the in-memory move
//! and any earlier writes stay applied.

use parking_lot::MutexGuard;
use rosterforge_protocol::{PlayerId, TransferOutcome, UserId};
use rosterforge_store::Store;

use crate::Team;
use crate::team::{PLAYER_PERSIST_FAILED, TeamInner};

pub(crate) const PLAYER_NOT_IN_TEAM: &str =
    "Player to transfer does not exist in this team";
pub(crate) const PLAYER_NOT_LISTED: &str =
    "Player is not in the market for transfer";
pub(crate) const BALANCE_TOO_LOW: &str =
    "Balance is not enough to transfer this player";
pub(crate) const BALANCE_OVERFLOW: &str =
    "Balance of the selling team cannot hold this transfer";
pub(crate) const REMOVE_FAILED: &str =
    "Failure to remove the player from its old team";
pub(crate) const SAME_TEAM: &str = "Player already belongs to this team";
pub(crate) const SELLER_PERSIST_FAILED: &str =
    "Persist of from team in store failed";
pub(crate) const BUYER_PERSIST_FAILED: &str =
    "Persist of to team in store failed";

impl Team {
    /// Buys `player_id` from `seller` into this team.
    ///
    /// `seller_owner` and `buyer_owner` are only used to write the team
    /// rows. On success the outcome carries this team's id; on failure it
    /// carries the seller's id and a message.
    pub fn transfer_player(
        &self,
        seller_owner: &UserId,
        seller: &Team,
        buyer_owner: &UserId,
        player_id: PlayerId,
        store: &dyn Store,
    ) -> TransferOutcome {
        let fail = |msg: &str| {
            tracing::debug!(
                buyer = %self.id(),
                seller = %seller.id(),
                %player_id,
                reason = msg,
                "transfer rejected"
            );
            TransferOutcome::failed(seller.id(), player_id, msg)
        };

        if self.id() == seller.id() {
            return fail(SAME_TEAM);
        }

        let (mut buyer, mut from) = lock_pair(self, seller);
        let buyer = &mut *buyer;
        let from = &mut *from;

        let Some(candidate) = from.roster.get(&player_id) else {
            return fail(PLAYER_NOT_IN_TEAM);
        };
        if !candidate.is_in_market() {
            return fail(PLAYER_NOT_LISTED);
        }
        let price = candidate.market_price();
        if buyer.balance < price {
            return fail(BALANCE_TOO_LOW);
        }
        let Some(seller_balance) = from.balance.checked_add(price) else {
            return fail(BALANCE_OVERFLOW);
        };
        let Some(mut player) = from.roster.remove(&player_id) else {
            return fail(REMOVE_FAILED);
        };

        from.balance = seller_balance;
        buyer.balance -= price;
        let percent = player.settle_transfer();
        let player_record = player.to_record(self.id());
        buyer.roster.insert(player_id, player);

        tracing::info!(
            buyer = %self.id(),
            seller = %seller.id(),
            %player_id,
            price,
            appreciation_percent = percent,
            "player transferred"
        );

        let seller_row = from.to_record(seller.id(), seller_owner);
        if let Err(e) = store.store_team_record(&seller_row) {
            tracing::warn!(team_id = %seller.id(), error = %e, "seller row not persisted");
            return TransferOutcome::failed(
                seller.id(),
                player_id,
                SELLER_PERSIST_FAILED,
            );
        }
        let buyer_row = buyer.to_record(self.id(), buyer_owner);
        if let Err(e) = store.store_team_record(&buyer_row) {
            tracing::warn!(team_id = %self.id(), error = %e, "buyer row not persisted");
            return TransferOutcome::failed(
                seller.id(),
                player_id,
                BUYER_PERSIST_FAILED,
            );
        }
        if let Err(e) = store.store_player_record(&player_record) {
            tracing::warn!(%player_id, error = %e, "player row not persisted");
            return TransferOutcome::failed(
                seller.id(),
                player_id,
                PLAYER_PERSIST_FAILED,
            );
        }

        TransferOutcome::ok(self.id(), player_id)
    }
}

/// Locks two distinct teams in ascending id order.
///
/// Returns the guards as `(buyer, seller)` regardless of which was locked
/// first.
fn lock_pair<'a>(
    buyer: &'a Team,
    seller: &'a Team,
) -> (MutexGuard<'a, TeamInner>, MutexGuard<'a, TeamInner>) {
    if buyer.id() < seller.id() {
        let b = buyer.lock();
        let s = seller.lock();
        (b, s)
    } else {
        let s = seller.lock();
        let b = buyer.lock();
        (b, s)
    }
}
