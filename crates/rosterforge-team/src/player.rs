//! One player's mutable state.
//!
//! A `Player` is only ever reachable mutably through its team's locked
//! roster, so every mutation below runs under that team's lock.

use rand::Rng;
use rosterforge_protocol::{
    PlayerId, PlayerSnapshot, PlayerType, PlayerUpdate, TeamId,
};
use rosterforge_store::PlayerRecord;

use crate::{TeamComposition, TeamError};

/// Transfer value of a player that is not listed on the market.
pub const NO_TRANSFER_VALUE: i64 = 0;

/// Bounds (inclusive, in percent) of the asset value appreciation applied
/// when a player is sold.
const APPRECIATION_PERCENT: std::ops::RangeInclusive<i64> = 10..=100;

/// A player on some team's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    id: PlayerId,
    player_type: PlayerType,
    first_name: String,
    last_name: String,
    country: String,
    age: u32,
    asset_value: i64,
    transfer_value: i64,
}

impl Player {
    /// Generates a starter player named after `index`.
    pub fn random(
        player_type: PlayerType,
        index: u64,
        composition: &TeamComposition,
    ) -> Self {
        let age = rand::rng().random_range(composition.age_range());
        Self {
            id: PlayerId::random(),
            player_type,
            first_name: format!("firstName_{index}"),
            last_name: format!("lastName_{index}"),
            country: format!("country_{index}"),
            age,
            asset_value: composition.asset_value,
            transfer_value: NO_TRANSFER_VALUE,
        }
    }

    /// Rebuilds a player from its stored row.
    pub fn from_record(record: &PlayerRecord) -> Self {
        Self {
            id: record.player_id,
            player_type: record.player_type,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            country: record.country.clone(),
            age: record.age,
            asset_value: record.asset_value,
            transfer_value: record.transfer_value,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    pub fn asset_value(&self) -> i64 {
        self.asset_value
    }

    pub fn transfer_value(&self) -> i64 {
        self.transfer_value
    }

    /// Immutable copy of this player, tagged with its current team.
    pub fn snapshot(&self, team_id: TeamId) -> PlayerSnapshot {
        PlayerSnapshot {
            player_id: self.id,
            player_type: self.player_type,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            country: self.country.clone(),
            age: self.age,
            asset_value: self.asset_value,
            transfer_value: self.transfer_value,
            team_id,
        }
    }

    /// The row persisted for this player under `team_id`.
    pub fn to_record(&self, team_id: TeamId) -> PlayerRecord {
        PlayerRecord {
            player_id: self.id,
            player_type: self.player_type,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            country: self.country.clone(),
            age: self.age,
            asset_value: self.asset_value,
            transfer_value: self.transfer_value,
            team_id,
        }
    }

    /// Applies the editable attributes of `update`.
    ///
    /// A negative transfer value is rejected and leaves the player
    /// untouched. The change is not committed until the caller has
    /// persisted it.
    pub fn update_attributes(
        &mut self,
        update: &PlayerUpdate,
    ) -> Result<(), TeamError> {
        if update.transfer_value < NO_TRANSFER_VALUE {
            return Err(TeamError::InvalidTransferValue(update.transfer_value));
        }
        self.first_name.clone_from(&update.first_name);
        self.last_name.clone_from(&update.last_name);
        self.country.clone_from(&update.country);
        self.transfer_value = update.transfer_value;
        Ok(())
    }

    /// Whether the player is listed for transfer.
    pub fn is_in_market(&self) -> bool {
        self.transfer_value > NO_TRANSFER_VALUE
    }

    /// Price a buyer pays for this player right now.
    pub fn market_price(&self) -> i64 {
        self.transfer_value
    }

    /// Finalizes a sale: the asset value appreciates by a random 10 to 100 percent
    /// and the player leaves the market. Returns the percentage applied.
    pub(crate) fn settle_transfer(&mut self) -> i64 {
        let percent = rand::rng().random_range(APPRECIATION_PERCENT);
        self.appreciate(percent);
        percent
    }

    fn appreciate(&mut self, percent: i64) {
        let mut increase = self.asset_value.saturating_mul(percent) / 100;
        if increase == 0 && self.asset_value > 0 {
            increase = 1;
        }
        self.asset_value = self.asset_value.saturating_add(increase);
        self.transfer_value = NO_TRANSFER_VALUE;
    }
}
