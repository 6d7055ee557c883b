mod utils;

use futures::future::join_all;
use scorebox::event::{MatchEvent, MatchEventHandler};
use scorebox::fixture::types::UpdateStatusRequest;
use scorebox::fixture::MatchStatus;
use scorebox::scoring::models::{ExtraType, WicketType};
use scorebox::scoring::types::AmendBallRequest;
use scorebox::standings::service::StandingsSubscriber;
use std::collections::HashSet;
use utils::{BallBuilder, TestSetupBuilder};

#[tokio::test]
async fn full_match_produces_scoreboard_scorecard_and_standings() {
    let setup = TestSetupBuilder::new().build().await;
    let fixture = setup.ongoing_match().await;

    let striker = &setup.team_a_players[0].id;
    let opener = &setup.team_b_players[0].id;
    let chaser = &setup.team_b_players[1].id;

    // First innings: 4, 6, 1, wide, 2, wicket, 0 -> 14/1 off 1.0 overs.
    let first_innings = vec![
        BallBuilder::new(1, striker, opener).runs(4).build(),
        BallBuilder::new(1, striker, opener).runs(6).build(),
        BallBuilder::new(1, striker, opener).runs(1).build(),
        BallBuilder::new(1, striker, opener)
            .extras(1, ExtraType::Wide)
            .build(),
        BallBuilder::new(1, striker, opener).runs(2).build(),
        BallBuilder::new(1, striker, opener)
            .wicket(WicketType::Bowled, striker)
            .build(),
        BallBuilder::new(1, striker, opener).build(),
    ];
    for ball in first_innings {
        setup
            .scoring_service
            .record_ball(&fixture.id, ball)
            .await
            .expect("recording should succeed");
    }

    let board = setup
        .scoring_service
        .live_scoreboard(&fixture.id)
        .await
        .expect("scoreboard should be available");
    assert_eq!(board.innings1.runs, 14);
    assert_eq!(board.innings1.wickets, 1);
    assert_eq!(board.innings1.overs, "1.0");
    assert_eq!(board.innings2.chase.target, Some(15));

    // Second innings: the chase falls short on 12 runs.
    let second_innings = vec![
        BallBuilder::new(2, chaser, striker).runs(6).build(),
        BallBuilder::new(2, chaser, striker).runs(6).build(),
        BallBuilder::new(2, chaser, striker).build(),
    ];
    for ball in second_innings {
        setup
            .scoring_service
            .record_ball(&fixture.id, ball)
            .await
            .expect("recording should succeed");
    }

    // Complete the match and rebuild the table.
    setup
        .match_service
        .set_status(
            &fixture.id,
            UpdateStatusRequest {
                status: MatchStatus::Completed,
                winner_id: None,
            },
        )
        .await
        .expect("completing the match should succeed");

    let card = setup
        .scoring_service
        .scorecard(&fixture.id)
        .await
        .expect("scorecard should build");
    let result = card.result.expect("completed match should carry a result");
    assert_eq!(result.winner_name.as_deref(), Some("Alphas"));
    assert_eq!(result.margin.as_deref(), Some("2 runs"));
    assert_eq!(card.innings[0].fall_of_wickets.len(), 1);
    assert_eq!(card.innings[0].extras.wides, 1);

    // Directly recompute the standings instead of relying on the event
    // system; the subscriber path is covered separately.
    let standings = setup
        .standings_service
        .recompute()
        .await
        .expect("standings should recompute");
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].team_name, "Alphas");
    assert_eq!(standings[0].points, 2);
    assert_eq!(standings[0].wins, 1);
    assert_eq!(standings[1].points, 0);
    assert_eq!(standings[1].losses, 1);
}

#[tokio::test]
async fn corrections_rebuild_every_derived_view() {
    let setup = TestSetupBuilder::new().build().await;
    let fixture = setup.ongoing_match().await;

    let striker = &setup.team_a_players[0].id;
    let bowler = &setup.team_b_players[0].id;

    let recorded = setup
        .scoring_service
        .record_ball(
            &fixture.id,
            BallBuilder::new(1, striker, bowler).runs(1).build(),
        )
        .await
        .unwrap();

    // The operator fat-fingered a single; it was actually a boundary.
    setup
        .scoring_service
        .amend_ball(
            &fixture.id,
            &recorded.id,
            AmendBallRequest {
                runs: 4,
                extras: 0,
                extra_type: None,
                wicket_type: None,
                wicket_player_id: None,
            },
        )
        .await
        .unwrap();

    let board = setup
        .scoring_service
        .live_scoreboard(&fixture.id)
        .await
        .unwrap();
    assert_eq!(board.innings1.runs, 4);

    let card = setup.scoring_service.scorecard(&fixture.id).await.unwrap();
    assert_eq!(card.innings[0].batting[0].fours, 1);

    // And a deletion takes the log back to empty.
    setup
        .scoring_service
        .remove_ball(&fixture.id, &recorded.id)
        .await
        .unwrap();
    let board = setup
        .scoring_service
        .live_scoreboard(&fixture.id)
        .await
        .unwrap();
    assert_eq!(board.innings1.runs, 0);
}

#[tokio::test]
async fn concurrent_operators_never_share_a_ball_slot() {
    let setup = TestSetupBuilder::new().build().await;
    let fixture = setup.ongoing_match().await;

    let striker = setup.team_a_players[0].id.clone();
    let bowler = setup.team_b_players[0].id.clone();

    let handles = (0..6)
        .map(|_| {
            let service = setup.scoring_service.clone();
            let match_id = fixture.id.clone();
            let striker = striker.clone();
            let bowler = bowler.clone();
            tokio::spawn(async move {
                service
                    .record_ball(&match_id, BallBuilder::new(1, &striker, &bowler).build())
                    .await
            })
        })
        .collect::<Vec<_>>();

    let results = join_all(handles).await;
    let deliveries: Vec<_> = results
        .into_iter()
        .map(|r| r.unwrap().expect("recording should succeed"))
        .collect();

    let slots: HashSet<(u32, u32)> = deliveries
        .iter()
        .map(|d| (d.over_number, d.ball_number))
        .collect();
    assert_eq!(slots.len(), 6, "every delivery should occupy its own slot");
    assert!(slots.contains(&(1, 1)));
    assert!(slots.contains(&(1, 6)));
}

#[tokio::test]
async fn free_hits_follow_no_balls_across_the_write_path() {
    let setup = TestSetupBuilder::new().build().await;
    let fixture = setup.ongoing_match().await;

    let striker = &setup.team_a_players[0].id;
    let bowler = &setup.team_b_players[0].id;

    setup
        .scoring_service
        .record_ball(
            &fixture.id,
            BallBuilder::new(1, striker, bowler)
                .extras(1, ExtraType::NoBall)
                .build(),
        )
        .await
        .unwrap();

    let free_hit = setup
        .scoring_service
        .record_ball(&fixture.id, BallBuilder::new(1, striker, bowler).build())
        .await
        .unwrap();
    assert!(free_hit.is_free_hit);

    let next = setup
        .scoring_service
        .record_ball(&fixture.id, BallBuilder::new(1, striker, bowler).build())
        .await
        .unwrap();
    assert!(!next.is_free_hit);
}

#[tokio::test]
async fn snapshot_refresh_is_idempotent() {
    let setup = TestSetupBuilder::new().build().await;
    let fixture = setup.ongoing_match().await;

    let striker = &setup.team_a_players[0].id;
    let bowler = &setup.team_b_players[0].id;

    for runs in [4, 1, 6] {
        setup
            .scoring_service
            .record_ball(
                &fixture.id,
                BallBuilder::new(1, striker, bowler).runs(runs).build(),
            )
            .await
            .unwrap();
    }

    let first = setup
        .scoring_service
        .refresh_scoreboard(&fixture)
        .await
        .unwrap();
    let second = setup
        .scoring_service
        .refresh_scoreboard(&fixture)
        .await
        .unwrap();

    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.runs, b.runs);
        assert_eq!(a.wickets, b.wickets);
        assert_eq!(a.overs, b.overs);
        assert_eq!(a.current_rr, b.current_rr);
        assert_eq!(a.required_rr, b.required_rr);
    }
}

#[tokio::test]
async fn completion_event_drives_the_standings_subscriber() {
    let setup = TestSetupBuilder::new().build().await;
    let fixture = setup.ongoing_match().await;

    let striker = &setup.team_a_players[0].id;
    let bowler = &setup.team_b_players[0].id;
    setup
        .scoring_service
        .record_ball(
            &fixture.id,
            BallBuilder::new(1, striker, bowler).runs(4).build(),
        )
        .await
        .unwrap();

    setup
        .match_service
        .set_status(
            &fixture.id,
            UpdateStatusRequest {
                status: MatchStatus::Completed,
                winner_id: Some(setup.team_a.id.clone()),
            },
        )
        .await
        .unwrap();

    // Drive the subscriber directly with the event it would receive.
    let subscriber = StandingsSubscriber::new(
        setup.standings_service.clone(),
        setup.event_bus.clone(),
    );
    let mut receiver = setup.event_bus.subscribe();
    subscriber
        .handle(&MatchEvent::StatusChanged {
            match_id: fixture.id.clone(),
            status: MatchStatus::Completed,
        })
        .await
        .expect("handling the completion event should succeed");

    let event = receiver.recv().await.expect("an event should be emitted");
    match event {
        MatchEvent::StandingsUpdated { standings, .. } => {
            assert_eq!(standings.len(), 2);
            let alphas = standings
                .iter()
                .find(|s| s.team_id == setup.team_a.id)
                .expect("team A should be in the table");
            assert_eq!(alphas.wins, 1);
            assert_eq!(alphas.points, 2);
        }
        other => panic!("unexpected event: {}", other.event_type()),
    }

    let cached = setup
        .standings_service
        .standings()
        .await
        .expect("cached standings should be served");
    assert_eq!(cached.len(), 2);
}
