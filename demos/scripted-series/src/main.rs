//! Plays one scripted series against the engine and prints every outcome
//! event as JSON, the way a transport layer would forward them.
//!
//! Run with `RUST_LOG=debug` to see the engine's own logs.

use std::time::Duration;

use gridduel::prelude::*;

const ALICE: PlayerId = PlayerId(1);
const BOB: PlayerId = PlayerId(2);

/// Short enough that the forfeit round doesn't drag.
const MOVE_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Script
// ---------------------------------------------------------------------------

enum Round {
    /// Play every move; the last one ends the match.
    Moves(&'static [(PlayerId, i32, i32)]),
    /// Play the moves, then let the next player's deadline run out.
    Stall(&'static [(PlayerId, i32, i32)]),
}

const SCRIPT: [Round; 6] = [
    // Alice takes the top row.
    Round::Moves(&[(ALICE, 0, 0), (BOB, 1, 0), (ALICE, 0, 1), (BOB, 1, 1), (ALICE, 0, 2)]),
    // Bob takes the middle row.
    Round::Moves(&[(ALICE, 0, 0), (BOB, 1, 0), (ALICE, 0, 1), (BOB, 1, 1), (ALICE, 2, 2), (BOB, 1, 2)]),
    // Nobody gets a line.
    Round::Moves(&[
        (ALICE, 0, 0),
        (BOB, 0, 1),
        (ALICE, 0, 2),
        (BOB, 1, 1),
        (ALICE, 1, 0),
        (BOB, 1, 2),
        (ALICE, 2, 1),
        (BOB, 2, 0),
        (ALICE, 2, 2),
    ]),
    // Bob never answers Alice's opening.
    Round::Stall(&[(ALICE, 1, 1)]),
    // Alice takes the main diagonal.
    Round::Moves(&[(ALICE, 0, 0), (BOB, 0, 1), (ALICE, 1, 1), (BOB, 0, 2), (ALICE, 2, 2)]),
    // Alice takes the left column: her third straight win.
    Round::Moves(&[(ALICE, 0, 0), (BOB, 0, 1), (ALICE, 1, 0), (BOB, 1, 1), (ALICE, 2, 0)]),
];

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    gridduel::telemetry::init();

    let engine = Engine::builder()
        .move_timeout(MOVE_TIMEOUT)
        .build(AnyPlayer);

    let series = engine.create_series(ALICE, BOB, PairingId(1)).await?;
    let printer = tokio::spawn(print_events(engine.subscribe(), series));

    for round in SCRIPT {
        let board = engine.start_new_match(series, 3).await?;
        tracing::info!(match_id = %board.id, "round started");

        match round {
            Round::Moves(moves) => play(&engine, series, moves).await?,
            Round::Stall(moves) => {
                play(&engine, series, moves).await?;
                tokio::time::sleep(MOVE_TIMEOUT + Duration::from_millis(100)).await;
            }
        }

        match engine.match_snapshot(series).await {
            Ok(Some(current)) => {
                tracing::info!(match_id = %current.id, winner = ?current.winner, "round over");
                println!("{current}");
            }
            Ok(None) => {}
            // A closed series is evicted as soon as its last move lands.
            Err(e) if e.is_not_found() => break,
            Err(e) => return Err(e.into()),
        }
    }

    printer.await?;
    Ok(())
}

async fn play(
    engine: &Engine<AnyPlayer>,
    series: SeriesId,
    moves: &[(PlayerId, i32, i32)],
) -> Result<(), GridError> {
    for &(actor, x, y) in moves {
        let result = engine.submit_move(series, actor, x, y).await?;
        if !result.is_accepted() {
            tracing::warn!(%actor, x, y, reasons = ?result.reasons(), "scripted move rejected");
        }
    }
    Ok(())
}

/// Prints events until the series leaves the directory.
async fn print_events(mut events: Subscription, series: SeriesId) {
    loop {
        match events.recv().await {
            Ok(event) => {
                match serde_json::to_string(&event) {
                    Ok(json) => println!("{json}"),
                    Err(e) => tracing::error!(error = %e, "event not serializable"),
                }
                if event == (OutcomeEvent::SeriesEvicted { series_id: series }) {
                    return;
                }
            }
            Err(BusError::Lagged(_)) => continue,
            Err(BusError::Closed) => return,
        }
    }
}
