//! End-to-end tests for the engine: series creation, full matches, move
//! deadlines and the events a transport layer would see.

use std::collections::HashSet;
use std::time::Duration;

use gridduel::prelude::*;

// =========================================================================
// Helpers
// =========================================================================

const A: PlayerId = PlayerId(1);
const B: PlayerId = PlayerId(2);

/// A wins the top row; B plays the middle row in between.
const A_TOP_ROW: [(PlayerId, i32, i32); 5] = [(A, 0, 0), (B, 1, 0), (A, 0, 1), (B, 1, 1), (A, 0, 2)];

/// B wins the middle row.
const B_MIDDLE_ROW: [(PlayerId, i32, i32); 6] =
    [(A, 0, 0), (B, 1, 0), (A, 0, 1), (B, 1, 1), (A, 2, 2), (B, 1, 2)];

fn engine() -> Engine<AnyPlayer> {
    Engine::builder().build(AnyPlayer)
}

async fn new_series(engine: &Engine<AnyPlayer>, pairing: u64) -> SeriesId {
    engine
        .create_series(A, B, PairingId(pairing))
        .await
        .unwrap()
}

async fn play(
    engine: &Engine<impl PlayerRegistry>,
    series: SeriesId,
    moves: &[(PlayerId, i32, i32)],
) -> MoveResult {
    let mut last = None;
    for &(actor, x, y) in moves {
        let result = engine.submit_move(series, actor, x, y).await.unwrap();
        assert!(result.is_accepted(), "{actor} ({x}, {y}): {:?}", result.reasons());
        last = Some(result);
    }
    last.unwrap()
}

/// Round-trips the series actor, then returns every buffered event.
async fn settle(
    engine: &Engine<impl PlayerRegistry>,
    series: SeriesId,
    events: &mut Subscription,
) -> Vec<OutcomeEvent> {
    let _ = engine.series_snapshot(series).await;
    events.drain()
}

// =========================================================================
// Scenarios
// =========================================================================

#[tokio::test]
async fn test_top_row_completes_win_for_a() {
    let engine = engine();
    let series = new_series(&engine, 1).await;
    engine.start_new_match(series, 3).await.unwrap();

    let before = play(&engine, series, &A_TOP_ROW[..4]).await;
    assert!(!before.ended, "no win before the row is complete");

    let result = engine.submit_move(series, A, 0, 2).await.unwrap();
    assert!(result.ended);
    assert_eq!(result.winner, Some(A));
    assert!(result.rejections.is_empty());

    let snapshot = engine.match_snapshot(series).await.unwrap().unwrap();
    assert!(snapshot.ended);
    assert_eq!(snapshot.board[0], vec![Cell::X, Cell::X, Cell::X]);
}

#[tokio::test(start_paused = true)]
async fn test_silent_player_forfeits_exactly_once() {
    let engine = engine();
    let mut events = engine.subscribe_to([EventKind::MoveTimedOut]);
    let series = new_series(&engine, 1).await;
    let started = engine.start_new_match(series, 3).await.unwrap();
    play(&engine, series, &[(A, 0, 0), (B, 1, 1)]).await;

    // A never answers.
    tokio::time::sleep(Duration::from_secs(16)).await;
    tokio::time::sleep(Duration::from_secs(60)).await;

    let timed_out = settle(&engine, series, &mut events).await;
    assert_eq!(
        timed_out,
        vec![OutcomeEvent::MoveTimedOut {
            series_id: series,
            match_id: started.id,
            winner_id: B,
        }]
    );

    let late = engine.submit_move(series, A, 2, 2).await.unwrap();
    assert!(!late.is_accepted());
    assert_eq!(late.reasons(), vec!["already ended".to_string()]);
    assert_eq!(late.winner, Some(B));

    let snapshot = engine.series_snapshot(series).await.unwrap();
    assert_eq!(snapshot.wins, [0, 1]);
}

#[tokio::test(start_paused = true)]
async fn test_answer_within_deadline_prevents_forfeit() {
    let engine = engine();
    let mut events = engine.subscribe();
    let series = new_series(&engine, 1).await;
    engine.start_new_match(series, 3).await.unwrap();

    engine.submit_move(series, A, 0, 0).await.unwrap();
    tokio::time::sleep(Duration::from_secs(14)).await;
    engine.submit_move(series, B, 1, 1).await.unwrap();
    tokio::time::sleep(Duration::from_secs(14)).await;
    engine.submit_move(series, A, 2, 2).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    let seen = settle(&engine, series, &mut events).await;
    assert!(seen.iter().all(|e| e.kind() != EventKind::MoveTimedOut));
    assert!(!engine.match_snapshot(series).await.unwrap().unwrap().ended);
}

#[tokio::test]
async fn test_outcome_events_in_order() {
    let engine = engine();
    let mut events = engine.subscribe();
    let series = new_series(&engine, 1).await;
    let started = engine.start_new_match(series, 3).await.unwrap();
    play(&engine, series, &A_TOP_ROW).await;

    let seen = settle(&engine, series, &mut events).await;
    assert_eq!(seen.len(), 6);
    assert_eq!(
        seen[0],
        OutcomeEvent::MatchCreated {
            series_id: series,
            match_id: started.id,
            board_size: 3,
        }
    );
    assert!(seen.iter().all(|e| e.series_id() == series));
    let OutcomeEvent::MoveApplied { result, actor, .. } = &seen[5] else {
        panic!("expected MoveApplied, got {:?}", seen[5]);
    };
    assert_eq!(*actor, A);
    assert_eq!(result.winner, Some(A));
}

// =========================================================================
// Rule properties through the engine
// =========================================================================

#[tokio::test]
async fn test_out_of_bounds_rejected_for_each_size() {
    let engine = engine();
    for (pairing, size) in [(1, 3usize), (2, 4), (3, 5)] {
        let series = engine
            .create_series(PlayerId(10 * pairing), PlayerId(10 * pairing + 1), PairingId(pairing))
            .await
            .unwrap();
        engine.start_new_match(series, size).await.unwrap();
        let first = PlayerId(10 * pairing);
        let n = size as i32;

        for (x, y) in [(-1, 0), (0, -1), (n, 0), (0, n), (n, n)] {
            let result = engine.submit_move(series, first, x, y).await.unwrap();
            assert!(!result.is_accepted(), "({x}, {y}) on {size}x{size}");
            assert!(
                result
                    .rejections
                    .iter()
                    .all(|r| matches!(r, MoveRejection::OutOfBounds { .. }))
            );
        }
        let both = engine.submit_move(series, first, n, -1).await.unwrap();
        assert_eq!(both.rejections.len(), 2);
    }
}

#[tokio::test]
async fn test_occupied_cell_rejected_for_either_player() {
    let engine = engine();
    let series = new_series(&engine, 1).await;
    engine.start_new_match(series, 3).await.unwrap();
    play(&engine, series, &[(A, 1, 1)]).await;

    let result = engine.submit_move(series, B, 1, 1).await.unwrap();
    assert_eq!(
        result.rejections,
        vec![MoveRejection::CellOccupied {
            coord: Coord::new(1, 1)
        }]
    );
    play(&engine, series, &[(B, 0, 0)]).await;
    let result = engine.submit_move(series, A, 0, 0).await.unwrap();
    assert!(!result.is_accepted());
}

#[tokio::test]
async fn test_turn_order_enforced() {
    let engine = engine();
    let series = new_series(&engine, 1).await;
    engine.start_new_match(series, 3).await.unwrap();

    let early = engine.submit_move(series, B, 0, 0).await.unwrap();
    assert_eq!(early.reasons(), vec!["wait for opponent".to_string()]);

    play(&engine, series, &[(A, 0, 0)]).await;
    let twice = engine.submit_move(series, A, 0, 1).await.unwrap();
    assert_eq!(twice.rejections, vec![MoveRejection::WaitForOpponent]);

    let stranger = engine.submit_move(series, PlayerId(99), 0, 1).await.unwrap();
    assert_eq!(stranger.reasons(), vec!["actor not in match".to_string()]);
}

// =========================================================================
// Series lifecycle
// =========================================================================

#[tokio::test]
async fn test_three_straight_wins_close_series() {
    let engine = engine();
    let mut events = engine.subscribe_to([EventKind::SeriesWonByStreak, EventKind::SeriesEvicted]);
    let series = new_series(&engine, 1).await;

    for _ in 0..3 {
        engine.start_new_match(series, 3).await.unwrap();
        play(&engine, series, &A_TOP_ROW).await;
    }

    assert_eq!(
        events.recv().await.unwrap(),
        OutcomeEvent::SeriesWonByStreak {
            series_id: series,
            winner_id: A,
        }
    );
    assert_eq!(
        events.recv().await.unwrap(),
        OutcomeEvent::SeriesEvicted { series_id: series }
    );
    assert_eq!(engine.series_count().await, 0);
    assert!(engine.series_of_player(A).await.is_none());

    // Both players are free for a new series.
    new_series(&engine, 2).await;
}

#[tokio::test]
async fn test_interleaved_loss_resets_streak() {
    let engine = Engine::builder().evict_finished_series(false).build(AnyPlayer);
    let series = new_series(&engine, 1).await;

    for moves in [&A_TOP_ROW[..], &A_TOP_ROW[..], &B_MIDDLE_ROW[..], &A_TOP_ROW[..]] {
        engine.start_new_match(series, 3).await.unwrap();
        play(&engine, series, moves).await;
    }

    let snapshot = engine.series_snapshot(series).await.unwrap();
    assert_eq!(snapshot.wins, [3, 1]);
    assert_eq!(snapshot.longest_streak, Some(Streak { player: A, len: 2 }));
    assert_eq!(snapshot.final_winner, None);
    assert!(snapshot.can_start_new_match);
}

#[tokio::test]
async fn test_tenth_total_win_closes_series() {
    let engine = Engine::builder().evict_finished_series(false).build(AnyPlayer);
    let mut events = engine.subscribe_to([EventKind::SeriesWonByTotal]);
    let series = new_series(&engine, 1).await;

    // A and B alternate wins, so no streak ever reaches 3.
    for round in 0..19 {
        engine.start_new_match(series, 3).await.unwrap();
        let moves = if round % 2 == 0 { &A_TOP_ROW[..] } else { &B_MIDDLE_ROW[..] };
        play(&engine, series, moves).await;
    }

    assert_eq!(
        events.recv().await.unwrap(),
        OutcomeEvent::SeriesWonByTotal {
            series_id: series,
            winner_id: A,
        }
    );
    let snapshot = engine.series_snapshot(series).await.unwrap();
    assert_eq!(snapshot.wins, [10, 9]);
    assert_eq!(snapshot.final_winner, Some(A));

    let err = engine.start_new_match(series, 3).await.unwrap_err();
    assert_eq!(err.to_string(), "series closed");
}

#[tokio::test]
async fn test_total_threshold_checked_before_streak() {
    let config = SessionConfig {
        series: SeriesConfig {
            total_wins_to_win: 3,
            ..Default::default()
        },
        evict_finished_series: false,
        ..Default::default()
    };
    let engine = Engine::builder().session_config(config).build(AnyPlayer);
    let mut events = engine.subscribe_to([EventKind::SeriesWonByTotal, EventKind::SeriesWonByStreak]);
    let series = new_series(&engine, 1).await;

    for _ in 0..3 {
        engine.start_new_match(series, 3).await.unwrap();
        play(&engine, series, &A_TOP_ROW).await;
    }

    assert_eq!(events.recv().await.unwrap().kind(), EventKind::SeriesWonByTotal);
    assert!(settle(&engine, series, &mut events).await.is_empty());
}

#[tokio::test]
async fn test_auto_rematch_keeps_series_moving() {
    let engine = Engine::builder().auto_start_next_match(true).build(AnyPlayer);
    let series = new_series(&engine, 1).await;
    let first = engine.start_new_match(series, 3).await.unwrap();

    play(&engine, series, &A_TOP_ROW).await;

    let current = engine.match_snapshot(series).await.unwrap().unwrap();
    assert_ne!(current.id, first.id);
    assert!(!current.ended);
    assert_eq!(engine.series_of_match(first.id).await, Some(series));
    assert_eq!(engine.series_of_match(current.id).await, Some(series));
}

// =========================================================================
// Series creation and lookup
// =========================================================================

#[tokio::test]
async fn test_create_series_rejections() {
    let known: HashSet<PlayerId> = [A, B, PlayerId(3)].into();
    let engine = Engine::builder().build(known);

    let same = engine.create_series(A, A, PairingId(1)).await.unwrap_err();
    assert_eq!(same, GridError::Session(SessionError::SamePlayer(A)));

    let unknown = engine.create_series(A, PlayerId(9), PairingId(1)).await.unwrap_err();
    assert_eq!(unknown, GridError::Session(SessionError::UnknownPlayer(PlayerId(9))));

    let series = engine.create_series(A, B, PairingId(1)).await.unwrap();

    let busy = engine.create_series(PlayerId(3), B, PairingId(2)).await.unwrap_err();
    assert_eq!(busy, GridError::Session(SessionError::PlayerBusy(B, series)));

    engine.remove_series(series).await.unwrap();
    engine.create_series(A, B, PairingId(3)).await.unwrap();
}

#[tokio::test]
async fn test_duplicate_pairing_rejected() {
    let engine = engine();
    let series = new_series(&engine, 7).await;

    let err = engine
        .create_series(PlayerId(3), PlayerId(4), PairingId(7))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        GridError::Session(SessionError::DuplicatePairing(PairingId(7), series))
    );
}

#[tokio::test]
async fn test_pairing_reusable_after_series_leaves_directory() {
    let engine = engine();
    let mut evictions = engine.subscribe_to([EventKind::SeriesEvicted]);

    // Removed by the collaborator.
    let removed = new_series(&engine, 3).await;
    engine.remove_series(removed).await.unwrap();
    let again = new_series(&engine, 3).await;
    assert_ne!(again, removed);
    assert_eq!(engine.series_of_pairing(PairingId(3)).await, Some(again));
    assert_eq!(
        evictions.recv().await.unwrap(),
        OutcomeEvent::SeriesEvicted { series_id: removed }
    );

    // Evicted after closing on a streak.
    for _ in 0..3 {
        engine.start_new_match(again, 3).await.unwrap();
        play(&engine, again, &A_TOP_ROW).await;
    }
    assert_eq!(
        evictions.recv().await.unwrap(),
        OutcomeEvent::SeriesEvicted { series_id: again }
    );
    assert_eq!(engine.series_of_pairing(PairingId(3)).await, None);

    let third = new_series(&engine, 3).await;
    assert_eq!(engine.series_of_pairing(PairingId(3)).await, Some(third));
}

#[tokio::test]
async fn test_lookup_by_player_match_and_pairing() {
    let engine = engine();
    let series = new_series(&engine, 7).await;
    let started = engine.start_new_match(series, 3).await.unwrap();

    assert_eq!(engine.series_of_player(A).await, Some(series));
    assert_eq!(engine.series_of_player(B).await, Some(series));
    assert_eq!(engine.series_of_pairing(PairingId(7)).await, Some(series));
    assert_eq!(engine.series_of_match(started.id).await, Some(series));
    assert_eq!(engine.series_of_player(PlayerId(3)).await, None);
}

#[tokio::test]
async fn test_unknown_series_reports_not_found() {
    let engine = engine();
    let mut events = engine.subscribe();
    let missing = SeriesId(u64::MAX);

    let err = engine.submit_move(missing, A, 0, 0).await.unwrap_err();
    assert!(err.is_not_found());

    let err = engine.start_new_match(missing, 3).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(
        events.try_recv().unwrap(),
        Some(OutcomeEvent::MatchCreationFailed {
            series_id: missing,
            reason: "series not found".into(),
        })
    );
}

#[tokio::test]
async fn test_remove_series_evicts_and_stops_actor() {
    let engine = engine();
    let mut events = engine.subscribe();
    let series = new_series(&engine, 1).await;

    engine.remove_series(series).await.unwrap();

    assert_eq!(
        events.try_recv().unwrap(),
        Some(OutcomeEvent::SeriesEvicted { series_id: series })
    );
    assert!(engine.series_snapshot(series).await.unwrap_err().is_not_found());
    assert!(engine.remove_series(series).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_move_before_any_match_is_series_error() {
    let engine = engine();
    let series = new_series(&engine, 1).await;

    let err = engine.submit_move(series, A, 0, 0).await.unwrap_err();
    assert_eq!(
        err,
        GridError::Session(SessionError::Series(SeriesError::NoCurrentMatch(series)))
    );
}

#[tokio::test]
async fn test_events_serialize_for_transport() {
    let engine = engine();
    let mut events = engine.subscribe_to([EventKind::MoveRejected]);
    let series = new_series(&engine, 1).await;
    engine.start_new_match(series, 3).await.unwrap();

    engine.submit_move(series, A, 5, 0).await.unwrap();

    let event = events.recv().await.unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "MoveRejected");
    assert_eq!(json["actor"], 1);
    assert_eq!(json["result"]["rejections"][0]["kind"], "out_of_bounds");
    assert_eq!(json["result"]["rejections"][0]["axis"], "X");
}
