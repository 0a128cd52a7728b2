use std::sync::Arc;

use rosterforge::prelude::*;
use rosterforge::telemetry;

// ---------------------------------------------------------------------------
// A short trading day: two managers, one listing, one transfer.
// ---------------------------------------------------------------------------

fn trade(directory: &Directory) -> Result<(), RosterError> {
    let password = "a2TT&d3mn";
    let seller = directory.sign_up(&Credential::new("seller@soccer.com", password))?;
    let buyer = directory.sign_up(&Credential::new("buyer@soccer.com", password))?;

    let home = directory.get_team(&seller, None)?;
    let star = &home.players[0];
    let listing = directory.update_player(
        &seller,
        star.player_id,
        &PlayerUpdate {
            player_id: star.player_id,
            first_name: "Diego".into(),
            last_name: "Maradona".into(),
            country: "Argentina".into(),
            transfer_value: 2_000_000,
        },
    )?;
    tracing::info!(ok = listing.is_ok(), "player listed");

    let market = directory.get_market(&buyer)?;
    tracing::info!(
        teams = market.teams.len(),
        players = market.listed_count(),
        "market open"
    );

    let outcome = directory.transfer(
        &buyer,
        &TransferRequest {
            team_id: home.team_id,
            player_id: star.player_id,
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&outcome).unwrap_or_default());

    for token in [&seller, &buyer] {
        let team = directory.get_team(token, None)?;
        println!(
            "{} ({}): balance {}, {} players",
            team.name,
            team.team_id,
            team.balance,
            team.players.len()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = RosterConfig::load()?;
    telemetry::init_tracing(&config.logging)?;

    let directory = Directory::builder()
        .config(&config)
        .build(Arc::new(MemoryStore::new()))?;
    directory.restore()?;
    directory.start_sweeper();

    let result = trade(&directory);
    directory.shutdown(true)?;
    result?;
    Ok(())
}
