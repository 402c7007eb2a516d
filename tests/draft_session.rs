//! End-to-end draft sessions over in-memory and loopback TCP streams

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use booster_draft::config::DraftSettings;
use booster_draft::core::codec::TextCodec;
use booster_draft::draft::{CardRef, Cube, CubePackSource, FixedPacks, Pack, PackGroup};
use booster_draft::error::DraftError;
use booster_draft::service::{serve, DraftObserver, DraftSession, NoopObserver, SessionState};
use booster_draft::transport::{ClientSummary, Connection, DraftClient, FirstCardPicker, Picker};
use futures::{SinkExt, StreamExt};
use tokio::io::{duplex, AsyncRead, AsyncWrite, DuplexStream};
use tokio::net::TcpListener;
use tokio_util::codec::Framed;

fn card(id: &str) -> CardRef {
    CardRef::new(id).unwrap()
}

fn pack(ids: &[&str]) -> Pack {
    Pack::from_ids(ids.iter().copied()).unwrap()
}

fn settings(players: usize) -> DraftSettings {
    DraftSettings {
        name: "Test draft".to_string(),
        players,
        packs_per_player: players,
        pack_size: 2,
    }
}

/// Server-side connections plus the matching client ends
fn table(players: usize) -> (Vec<Connection<DuplexStream>>, Vec<DuplexStream>) {
    (0..players)
        .map(|slot| {
            let (server, client) = duplex(4096);
            (Connection::new(slot, format!("player-{slot}"), server, 10), client)
        })
        .unzip()
}

#[derive(Default)]
struct RecordingObserver {
    states: Mutex<Vec<SessionState>>,
    picks: Mutex<Vec<(usize, usize, CardRef)>>,
}

impl DraftObserver for RecordingObserver {
    fn state_changed(&self, state: &SessionState) {
        self.states.lock().unwrap().push(state.clone());
    }

    fn pick_applied(&self, group: usize, slot: usize, card: &CardRef) {
        self.picks.lock().unwrap().push((group, slot, card.clone()));
    }
}

async fn auto_player<S>(client: DraftClient<S>) -> booster_draft::Result<ClientSummary>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    client.run(&mut FirstCardPicker).await
}

/// Plays with [`FirstCardPicker`] and records every offer it was shown
async fn recording_player(stream: DuplexStream) -> (Vec<CardRef>, Vec<Vec<CardRef>>) {
    let mut offers = Vec::new();
    let mut picker = |pack: usize, offer: &[CardRef]| -> booster_draft::Result<CardRef> {
        offers.push(offer.to_vec());
        FirstCardPicker.pick(pack, offer)
    };
    let summary = DraftClient::from_stream(stream, 10)
        .run(&mut picker)
        .await
        .unwrap();
    (summary.pile, offers)
}

// ============================================================================
// ROTATION SCENARIOS
// ============================================================================

#[tokio::test]
async fn test_two_player_single_group_scenario() {
    let (connections, clients) = table(2);
    let observer = Arc::new(RecordingObserver::default());
    let session = DraftSession::new(&settings(2), connections, observer.clone()).unwrap();

    let players: Vec<_> = clients
        .into_iter()
        .map(|stream| tokio::spawn(recording_player(stream)))
        .collect();

    let group = PackGroup::new(vec![pack(&["A", "B"]), pack(&["C", "D"])]);
    let outcome = session.run_with_groups(vec![group]).await.unwrap();

    let mut results = Vec::new();
    for player in players {
        results.push(player.await.unwrap());
    }

    assert_eq!(results[0].1, vec![vec![card("A"), card("B")], vec![card("D")]]);
    assert_eq!(results[1].1, vec![vec![card("C"), card("D")], vec![card("B")]]);
    assert_eq!(results[0].0, vec![card("A"), card("D")]);
    assert_eq!(results[1].0, vec![card("C"), card("B")]);

    assert_eq!(outcome.picks, vec![results[0].0.clone(), results[1].0.clone()]);
    assert_eq!(outcome.groups, 1);
    assert_eq!(outcome.rounds, 2);
    assert_eq!(outcome.name, "Test draft");

    let states = observer.states.lock().unwrap().clone();
    assert_eq!(
        states,
        vec![
            SessionState::Announcing,
            SessionState::DraftingGroup { group: 0 },
            SessionState::RotatingPick { group: 0, round: 0, shift: 0 },
            SessionState::RotatingPick { group: 0, round: 1, shift: 1 },
            SessionState::GroupComplete { group: 0 },
            SessionState::DraftComplete,
        ]
    );
    assert_eq!(observer.picks.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn test_group_sequencing_sends_boundaries_then_stop() {
    let (connections, clients) = table(2);
    let session = DraftSession::new(&settings(2), connections, Arc::new(NoopObserver)).unwrap();

    let players: Vec<_> = clients
        .into_iter()
        .map(|stream| {
            tokio::spawn(async move {
                let mut framed = Framed::new(stream, TextCodec::default());
                let mut seen = Vec::new();
                while let Some(text) = framed.next().await {
                    let text = text.unwrap();
                    seen.push(text.clone());
                    match text.as_str() {
                        "STOP_DRAFTING" => break,
                        "NEXT_PACK" | "Test draft" => {}
                        offer => {
                            let first = offer.split(' ').next().unwrap().to_string();
                            framed.send(first).await.unwrap();
                        }
                    }
                }
                seen
            })
        })
        .collect();

    let mut source = FixedPacks::new(vec![
        pack(&["1", "2"]),
        pack(&["3", "4"]),
        pack(&["5", "6"]),
        pack(&["7", "8"]),
    ]);
    let outcome = session.run(&mut source).await.unwrap();
    assert_eq!(outcome.groups, 2);
    assert_eq!(outcome.rounds, 4);

    for player in players {
        let seen = player.await.unwrap();
        assert_eq!(seen.first().map(String::as_str), Some("Test draft"));
        assert_eq!(seen.last().map(String::as_str), Some("STOP_DRAFTING"));
        assert_eq!(seen.iter().filter(|m| *m == "NEXT_PACK").count(), 1);
        assert_eq!(seen.iter().filter(|m| *m == "STOP_DRAFTING").count(), 1);
        // announce, 2 offers, boundary, 2 offers, stop
        assert_eq!(seen.len(), 7);
        assert_eq!(seen[3], "NEXT_PACK");
    }
}

#[tokio::test]
async fn test_offers_reflect_round_start_state() {
    let players = 3;
    let (connections, clients) = table(players);
    let session =
        DraftSession::new(&settings(players), connections, Arc::new(NoopObserver)).unwrap();

    let tasks: Vec<_> = clients
        .into_iter()
        .map(|stream| tokio::spawn(recording_player(stream)))
        .collect();

    let group = PackGroup::new(vec![
        pack(&["a1", "a2", "a3"]),
        pack(&["b1", "b2", "b3"]),
        pack(&["c1", "c2", "c3"]),
    ]);
    let outcome = session.run_with_groups(vec![group]).await.unwrap();

    let mut offers = Vec::new();
    for task in tasks {
        offers.push(task.await.unwrap().1);
    }

    // every pack is offered whole in round 0, and every round's offers are disjoint
    for round in 0..3 {
        let sizes: Vec<_> = offers.iter().map(|o| o[round].len()).collect();
        assert_eq!(sizes, vec![3 - round; 3]);
        let mut cards = HashSet::new();
        for player in &offers {
            for c in &player[round] {
                assert!(cards.insert(c.clone()), "{c} offered twice in round {round}");
            }
        }
    }

    let all: HashSet<_> = outcome.picks.iter().flatten().cloned().collect();
    assert_eq!(all.len(), 9);
    assert!(outcome.picks.iter().all(|pile| pile.len() == 3));
}

// ============================================================================
// FAILURE HANDLING
// ============================================================================

#[tokio::test]
async fn test_pick_outside_assigned_pack_aborts() {
    let (connections, mut clients) = table(2);
    let session = DraftSession::new(&settings(2), connections, Arc::new(NoopObserver)).unwrap();

    let honest = tokio::spawn(auto_player(DraftClient::from_stream(
        clients.pop().unwrap(),
        10,
    )));
    let cheat = tokio::spawn(async move {
        let mut framed = Framed::new(clients.pop().unwrap(), TextCodec::default());
        let _name = framed.next().await.unwrap().unwrap();
        let _offer = framed.next().await.unwrap().unwrap();
        // "C" is in slot 1's pack, not slot 0's
        framed.send("C").await.unwrap();
        framed
    });

    let group = PackGroup::new(vec![pack(&["A", "B"]), pack(&["C", "D"])]);
    let result = session.run_with_groups(vec![group]).await;
    assert!(matches!(result, Err(DraftError::Protocol(_))), "{result:?}");

    let _ = cheat.await.unwrap();
    assert!(honest.await.unwrap().is_err());
}

#[tokio::test]
async fn test_mismatched_group_rejected_before_announce() {
    let (connections, clients) = table(2);
    let session = DraftSession::new(&settings(2), connections, Arc::new(NoopObserver)).unwrap();

    let group = PackGroup::new(vec![pack(&["A", "B"]), pack(&["C", "D"]), pack(&["E", "F"])]);
    let result = session.run_with_groups(vec![group]).await;
    assert!(matches!(result, Err(DraftError::Configuration(_))));

    // nothing was sent, the session simply hung up
    for stream in clients {
        let mut framed = Framed::new(stream, TextCodec::default());
        assert!(framed.next().await.is_none());
    }
}

#[tokio::test]
async fn test_session_requires_every_player() {
    let (connections, _clients) = table(1);
    let result = DraftSession::new(&settings(2), connections, Arc::new(NoopObserver));
    assert!(matches!(result, Err(DraftError::Configuration(_))));
}

#[tokio::test]
async fn test_disconnect_mid_round_is_connection_lost() {
    let (connections, mut clients) = table(2);
    let session = DraftSession::new(&settings(2), connections, Arc::new(NoopObserver)).unwrap();

    let leaver = clients.remove(0);
    let stayer = tokio::spawn(auto_player(DraftClient::from_stream(clients.remove(0), 10)));
    drop(leaver);

    let group = PackGroup::new(vec![pack(&["A", "B"]), pack(&["C", "D"])]);
    let result = session.run_with_groups(vec![group]).await;
    assert!(matches!(result, Err(DraftError::ConnectionLost)), "{result:?}");
    assert!(stayer.await.unwrap().is_err());
}

// ============================================================================
// TCP
// ============================================================================

#[tokio::test]
async fn test_serve_full_draft_over_tcp() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap().to_string();

    let settings = DraftSettings {
        name: "Loopback cube".to_string(),
        players: 3,
        packs_per_player: 3,
        pack_size: 3,
    };
    let cube = Cube::new("loopback", (0..30).map(|i| format!("c{i}"))).unwrap();
    let mut source = CubePackSource::new(cube, settings.pack_size).with_seed(7);

    let server = tokio::spawn(async move {
        serve(listener, 10, &settings, &mut source, Arc::new(NoopObserver)).await
    });

    let mut players = Vec::new();
    for _ in 0..3 {
        let client = DraftClient::connect(&address, 10).await.unwrap();
        players.push(tokio::spawn(auto_player(client)));
    }

    let outcome = server.await.unwrap().unwrap();
    let mut client_cards = HashSet::new();
    for player in players {
        let summary = player.await.unwrap().unwrap();
        assert_eq!(summary.draft_name, "Loopback cube");
        assert_eq!(summary.packs_opened, 3);
        assert_eq!(summary.pile.len(), 9);
        client_cards.extend(summary.pile);
    }

    let server_cards: HashSet<_> = outcome.picks.into_iter().flatten().collect();
    assert_eq!(server_cards.len(), 27);
    assert_eq!(client_cards, server_cards);
    assert_eq!(outcome.groups, 3);
    assert_eq!(outcome.rounds, 9);
}
