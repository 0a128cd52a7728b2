//! Integration tests for teams and the transfer protocol.

use std::sync::Arc;

use rosterforge_protocol::{PlayerId, PlayerUpdate, UserId};
use rosterforge_store::{MemoryStore, RecordKind};
use rosterforge_team::{NameSequence, Team, TeamComposition};

// =========================================================================
// Helpers
// =========================================================================

fn uid(name: &str) -> UserId {
    UserId::parse(&format!("{name}@soccer.com")).expect("valid user id")
}

fn starter() -> Team {
    Team::random(&TeamComposition::default(), &NameSequence::new())
}

/// Lists the first `count` players of `team` at `price` and returns their ids.
fn list(team: &Team, count: usize, price: i64, store: &MemoryStore) -> Vec<PlayerId> {
    let ids: Vec<PlayerId> = team
        .snapshot(None)
        .unwrap()
        .players
        .iter()
        .take(count)
        .map(|p| p.player_id)
        .collect();
    for id in &ids {
        let outcome = team.update_player(
            &PlayerUpdate {
                player_id: *id,
                first_name: "first".into(),
                last_name: "last".into(),
                country: "somewhere".into(),
                transfer_value: price,
            },
            store,
        );
        assert!(outcome.is_ok(), "listing failed: {outcome:?}");
    }
    ids
}

// =========================================================================
// Single transfers
// =========================================================================

#[test]
fn test_transfer_player_moves_player_and_money() {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();
    let pid = list(&seller, 1, 1_000_000, &store)[0];
    let asset_before = seller.snapshot(None).unwrap().player(pid).unwrap().asset_value;

    let outcome = buyer.transfer_player(&uid("seller"), &seller, &uid("buyer"), pid, &store);

    assert!(outcome.is_ok());
    assert_eq!(outcome.team_id, buyer.id());
    assert_eq!(outcome.player_id, pid);
    assert_eq!(seller.balance(), 6_000_000);
    assert_eq!(buyer.balance(), 4_000_000);
    assert_eq!(seller.roster_len(), 19);
    assert_eq!(buyer.roster_len(), 21);
    assert!(!seller.contains_player(pid));

    let moved = buyer.snapshot(None).unwrap().player(pid).cloned().unwrap();
    assert_eq!(moved.team_id, buyer.id());
    assert_eq!(moved.transfer_value, 0);
    assert!(moved.asset_value >= asset_before + asset_before / 10);
    assert!(moved.asset_value <= asset_before * 2);

    let row = store.player_record(pid).unwrap();
    assert_eq!(row.team_id, buyer.id());
    assert_eq!(store.team_record(seller.id()).unwrap().balance, 6_000_000);
    assert_eq!(store.team_record(buyer.id()).unwrap().balance, 4_000_000);
}

#[test]
fn test_transfer_player_unlisted_player_rejected() {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();
    let pid = seller.snapshot(None).unwrap().players[0].player_id;

    let outcome = buyer.transfer_player(&uid("s"), &seller, &uid("b"), pid, &store);

    assert_eq!(
        outcome.error.as_deref(),
        Some("Player is not in the market for transfer")
    );
    assert_eq!(outcome.team_id, seller.id());
    assert!(seller.contains_player(pid));
    assert_eq!(seller.balance(), 5_000_000);
    assert_eq!(buyer.balance(), 5_000_000);
}

#[test]
fn test_transfer_player_unknown_player_rejected() {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();

    let outcome =
        buyer.transfer_player(&uid("s"), &seller, &uid("b"), PlayerId::random(), &store);

    assert_eq!(
        outcome.error.as_deref(),
        Some("Player to transfer does not exist in this team")
    );
}

#[test]
fn test_transfer_player_insufficient_funds_rejected() {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();
    let pid = list(&seller, 1, 5_000_001, &store)[0];

    let outcome = buyer.transfer_player(&uid("s"), &seller, &uid("b"), pid, &store);

    assert_eq!(
        outcome.error.as_deref(),
        Some("Balance is not enough to transfer this player")
    );
    assert_eq!(seller.roster_len(), 20);
    assert_eq!(buyer.roster_len(), 20);
    assert_eq!(buyer.balance(), 5_000_000);
}

#[test]
fn test_transfer_player_exact_balance_accepted() {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();
    let pid = list(&seller, 1, 5_000_000, &store)[0];

    let outcome = buyer.transfer_player(&uid("s"), &seller, &uid("b"), pid, &store);

    assert!(outcome.is_ok());
    assert_eq!(buyer.balance(), 0);
    assert_eq!(seller.balance(), 10_000_000);
}

#[test]
fn test_transfer_player_sold_player_not_resellable_until_relisted() {
    let store = MemoryStore::started();
    let a = starter();
    let b = starter();
    let pid = list(&a, 1, 100, &store)[0];

    assert!(b.transfer_player(&uid("a"), &a, &uid("b"), pid, &store).is_ok());
    let back = a.transfer_player(&uid("b"), &b, &uid("a"), pid, &store);
    assert_eq!(
        back.error.as_deref(),
        Some("Player is not in the market for transfer")
    );
}

#[test]
fn test_transfer_player_from_mismatched_team_rejected() {
    let store = MemoryStore::started();
    let a = starter();
    let b = starter();
    let c = starter();
    let pid = list(&a, 1, 100, &store)[0];

    // The player is on `a`, but the buyer names `b` as the seller.
    let outcome = c.transfer_player(&uid("b"), &b, &uid("c"), pid, &store);
    assert!(!outcome.is_ok());
    assert!(a.contains_player(pid));
}

// =========================================================================
// Persistence failures during a transfer
// =========================================================================

fn transfer_with_team_writes_allowed(successes: usize) -> (Team, Team, PlayerId, Option<String>) {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();
    let pid = list(&seller, 1, 1_000, &store)[0];
    store.fail_after(RecordKind::Team, successes);

    let outcome = buyer.transfer_player(&uid("s"), &seller, &uid("b"), pid, &store);
    (seller, buyer, pid, outcome.error)
}

#[test]
fn test_transfer_player_seller_persist_failure_reported() {
    let (seller, buyer, pid, error) = transfer_with_team_writes_allowed(0);
    assert_eq!(error.as_deref(), Some("Persist of from team in store failed"));
    // The in-memory move is not rolled back.
    assert!(buyer.contains_player(pid));
    assert!(!seller.contains_player(pid));
}

#[test]
fn test_transfer_player_buyer_persist_failure_reported() {
    let (_, _, _, error) = transfer_with_team_writes_allowed(1);
    assert_eq!(error.as_deref(), Some("Persist of to team in store failed"));
}

#[test]
fn test_transfer_player_player_persist_failure_reported() {
    let store = MemoryStore::started();
    let seller = starter();
    let buyer = starter();
    let pid = list(&seller, 1, 1_000, &store)[0];
    store.fail_after(RecordKind::Player, 0);

    let outcome = buyer.transfer_player(&uid("s"), &seller, &uid("b"), pid, &store);

    assert_eq!(
        outcome.error.as_deref(),
        Some("Persist of player in store failed")
    );
    assert_eq!(outcome.team_id, seller.id());
    // Both team rows were written before the failing player row.
    assert_eq!(store.team_record(seller.id()).unwrap().balance, 5_001_000);
    assert_eq!(store.player_record(pid).unwrap().team_id, seller.id());
}

// =========================================================================
// Concurrency
// =========================================================================

/// Opposite transfers between the same two teams, run in parallel, must
/// neither deadlock nor create or destroy money or players.
#[test]
fn test_transfer_player_opposite_directions_concurrently_conserves_totals() {
    const PER_SIDE: usize = 10;

    let store = Arc::new(MemoryStore::started());
    let a = Arc::new(starter());
    let b = Arc::new(starter());
    let from_a = list(&a, PER_SIDE, 10_000, &store);
    let from_b = list(&b, PER_SIDE, 20_000, &store);
    let (owner_a, owner_b) = (uid("alpha"), uid("bravo"));

    std::thread::scope(|scope| {
        scope.spawn(|| {
            for pid in &from_a {
                let out = b.transfer_player(&owner_a, &a, &owner_b, *pid, store.as_ref());
                assert!(out.is_ok(), "{out:?}");
            }
        });
        scope.spawn(|| {
            for pid in &from_b {
                let out = a.transfer_player(&owner_b, &b, &owner_a, *pid, store.as_ref());
                assert!(out.is_ok(), "{out:?}");
            }
        });
    });

    assert_eq!(a.balance() + b.balance(), 10_000_000);
    assert_eq!(a.balance(), 5_000_000 - 20_000 * PER_SIDE as i64 + 10_000 * PER_SIDE as i64);
    assert_eq!(a.roster_len() + b.roster_len(), 40);
    assert_eq!(a.roster_len(), 20);
    for pid in &from_a {
        assert!(b.contains_player(*pid) && !a.contains_player(*pid));
    }
    for pid in &from_b {
        assert!(a.contains_player(*pid) && !b.contains_player(*pid));
    }
}

/// Several buyers racing for the same listed player: exactly one wins.
#[test]
fn test_transfer_player_contended_player_sold_once() {
    let store = MemoryStore::started();
    let seller = starter();
    let pid = list(&seller, 1, 1_000, &store)[0];
    let buyers: Vec<Team> = (0..8).map(|_| starter()).collect();

    let wins: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = buyers
            .iter()
            .map(|buyer| {
                let (seller, store) = (&seller, &store);
                scope.spawn(move || {
                    buyer
                        .transfer_player(&uid("s"), seller, &uid("b"), pid, store)
                        .is_ok()
                })
            })
            .collect();
        handles.into_iter().map(|h| usize::from(h.join().unwrap())).sum()
    });

    assert_eq!(wins, 1);
    assert_eq!(seller.balance(), 5_001_000);
    let holders = buyers.iter().filter(|b| b.contains_player(pid)).count();
    assert_eq!(holders, 1);
}

#[test]
fn test_market_listing_only_listed_players() {
    let store = MemoryStore::started();
    let team = starter();
    assert!(team.market_listing().is_none());

    let listed = list(&team, 3, 42, &store);
    let listing = team.market_listing().unwrap();
    assert_eq!(listing.team_id, team.id());
    assert_eq!(listing.players.len(), 3);
    assert!(listing.players.iter().all(|p| listed.contains(&p.player_id)));
    assert!(listing.players.windows(2).all(|w| w[0].player_id < w[1].player_id));
}

#[test]
fn test_from_records_rebuilds_persisted_team() {
    use rosterforge_store::Store;

    let store = MemoryStore::started();
    let team = starter();
    team.persist(true, &uid("owner"), &store).unwrap();

    let row = store.team_record(team.id()).unwrap();
    let players = store.load_player_records().unwrap();
    let rebuilt = Team::from_records(&row, &players).unwrap();

    assert_eq!(rebuilt.snapshot(None).unwrap(), team.snapshot(None).unwrap());
}
