use mnk_core::constants::default_player_configs;
use mnk_core::{BoardSize, CellContent, ConfigError, Position, process_move};
use online_lib::{GameStore, MemoryStore, OnlineError, OnlineSession, game_id_from_url};
use protocol::{CHANNEL_BUFFER_SIZE, OnlineGameConfig, OnlineStatus, RowPatch};
use std::sync::Arc;

type Session = OnlineSession<MemoryStore>;

fn config(m: usize, n: usize, k: usize, players: usize) -> OnlineGameConfig {
    OnlineGameConfig {
        board_size: BoardSize::new(m, n),
        win_length: k,
        player_configs: default_player_configs(players),
        allow_moving_opponent_pieces: true,
    }
}

/// Creates a game and seats `players` sessions, host first. All sessions are synced.
async fn seated(
    store: &Arc<MemoryStore>,
    config: &OnlineGameConfig,
    players: usize,
) -> Vec<Session> {
    let mut host = OnlineSession::new(store.clone());
    let game_id = host.create_game(config).await.unwrap();
    let mut sessions = vec![host];
    for expected_slot in 1..players {
        let mut guest = OnlineSession::new(store.clone());
        assert_eq!(guest.join_game(&game_id).await.unwrap(), expected_slot);
        sessions.push(guest);
    }
    sync_all(&mut sessions);
    sessions
}

fn sync_all(sessions: &mut [Session]) {
    for session in sessions.iter_mut() {
        session.poll_updates().unwrap();
    }
}

fn piece_at(session: &Session, row: usize, col: usize) -> Option<CellContent> {
    session.state().board.get(Position::new(row, col))
}

#[tokio::test]
async fn create_and_join() {
    let store = Arc::new(MemoryStore::new());
    let mut host = OnlineSession::new(store.clone());
    let game_id = host.create_game(&config(3, 3, 3, 2)).await.unwrap();

    assert_eq!(host.online_state().status, OnlineStatus::Waiting);
    assert_eq!(host.online_state().player_index, Some(0));
    assert_eq!(host.online_state().players_joined, 1);
    assert!(host.state().game_started);
    assert_eq!(host.state().board.size(), BoardSize::new(3, 3));

    let link = host.shareable_link("https://play.example").unwrap();
    assert_eq!(game_id_from_url(&link).as_deref(), Some(game_id.as_str()));

    let mut guest = OnlineSession::new(store.clone());
    assert_eq!(guest.join_game(&game_id).await.unwrap(), 1);
    assert_eq!(guest.online_state().status, OnlineStatus::Playing);
    assert_eq!(guest.online_state().players_joined, 2);

    // The host learns about the guest through its subscription.
    assert_eq!(host.poll_updates().unwrap(), 1);
    assert_eq!(host.online_state().status, OnlineStatus::Playing);
    assert_eq!(host.online_state().players_joined, 2);
    assert!(host.is_my_turn());
    assert!(!guest.is_my_turn());
}

#[tokio::test]
async fn reconnect_reuses_the_seat() {
    let store = Arc::new(MemoryStore::new());
    let sessions = seated(&store, &config(3, 3, 3, 3), 2).await;
    let game_id = sessions[0].online_state().game_id.clone().unwrap();

    let token = sessions[1].player_token().to_string();
    let mut again = OnlineSession::with_token(store.clone(), token);
    assert_eq!(again.join_game(&game_id).await.unwrap(), 1);
    assert_eq!(again.online_state().players_joined, 2);
    assert_eq!(again.online_state().status, OnlineStatus::Waiting);
}

#[tokio::test]
async fn full_and_unknown_games_are_rejected() {
    let store = Arc::new(MemoryStore::new());
    let sessions = seated(&store, &config(3, 3, 3, 2), 2).await;
    let game_id = sessions[0].online_state().game_id.clone().unwrap();

    let mut late = OnlineSession::new(store.clone());
    assert!(matches!(late.join_game(&game_id).await, Err(OnlineError::GameFull)));
    assert_eq!(late.online_state().status, OnlineStatus::Error);
    assert!(late.online_state().error.is_some());

    let mut lost = OnlineSession::new(store.clone());
    assert!(matches!(
        lost.join_game("no-such-game").await,
        Err(OnlineError::GameNotFound(_))
    ));
    assert_eq!(lost.online_state().status, OnlineStatus::Error);
}

#[tokio::test]
async fn invalid_config_is_rejected_before_insert() {
    let store = Arc::new(MemoryStore::new());
    let mut host = OnlineSession::new(store.clone());
    let result = host.create_game(&config(3, 3, 4, 2)).await;
    assert!(matches!(
        result,
        Err(OnlineError::InvalidConfig(ConfigError::WinLengthTooLong { .. }))
    ));
    assert_eq!(store.game_count().await, 0);
    assert_eq!(host.online_state().status, OnlineStatus::Error);
}

#[tokio::test]
async fn moves_arrive_through_the_store() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 2), 2).await;

    sessions[0].click(Position::new(0, 0)).await.unwrap();
    // No optimistic update: the mover sees the piece only once the row comes back.
    assert_eq!(piece_at(&sessions[0], 0, 0), Some(CellContent::Empty));

    sync_all(&mut sessions);
    for session in &sessions {
        assert_eq!(piece_at(session, 0, 0), Some(CellContent::Piece(0)));
        assert_eq!(session.state().current_player, 1);
    }

    // Out of turn clicks are dropped without a write.
    sessions[0].click(Position::new(1, 1)).await.unwrap();
    assert_eq!(sessions[1].poll_updates().unwrap(), 0);
    assert!(matches!(
        sessions[0].make_move(Position::new(1, 1), None).await,
        Err(OnlineError::NotYourTurn)
    ));
}

#[tokio::test]
async fn relocating_an_opponent_piece() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(4, 4, 3, 2), 2).await;

    sessions[0].click(Position::new(0, 0)).await.unwrap();
    sync_all(&mut sessions);

    sessions[1].click(Position::new(0, 0)).await.unwrap();
    assert_eq!(sessions[1].state().selected_cell, Some(Position::new(0, 0)));
    // Selections are local.
    assert_eq!(sessions[0].poll_updates().unwrap(), 0);

    sessions[1].click(Position::new(2, 2)).await.unwrap();
    sync_all(&mut sessions);
    for session in &sessions {
        assert_eq!(piece_at(session, 0, 0), Some(CellContent::Empty));
        assert_eq!(piece_at(session, 2, 2), Some(CellContent::Piece(0)));
        assert_eq!(session.state().current_player, 0);
        assert_eq!(session.state().selected_cell, None);
    }
}

#[tokio::test]
async fn relocation_is_refused_when_the_rule_is_off() {
    let store = Arc::new(MemoryStore::new());
    let config = OnlineGameConfig {
        allow_moving_opponent_pieces: false,
        ..config(3, 3, 3, 2)
    };
    let mut sessions = seated(&store, &config, 2).await;

    sessions[0].click(Position::new(0, 0)).await.unwrap();
    sync_all(&mut sessions);

    assert!(matches!(
        sessions[1]
            .make_move(Position::new(2, 2), Some(Position::new(0, 0)))
            .await,
        Err(OnlineError::IllegalMove { .. })
    ));
    sessions[1].click(Position::new(0, 0)).await.unwrap();
    assert_eq!(sessions[1].state().selected_cell, None);

    assert_eq!(sessions[0].poll_updates().unwrap(), 0);
    for session in &sessions {
        assert_eq!(piece_at(session, 0, 0), Some(CellContent::Piece(0)));
        assert_eq!(piece_at(session, 2, 2), Some(CellContent::Empty));
        assert_eq!(session.state().current_player, 1);
    }
}

#[tokio::test]
async fn rematch_waits_for_the_end_of_the_game() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 2), 2).await;

    sessions[0].click(Position::new(1, 1)).await.unwrap();
    sync_all(&mut sessions);
    for session in sessions.iter_mut() {
        assert!(matches!(
            session.request_rematch().await,
            Err(OnlineError::GameNotFinished)
        ));
    }
    sync_all(&mut sessions);
    assert_eq!(piece_at(&sessions[0], 1, 1), Some(CellContent::Piece(0)));
    assert_eq!(sessions[1].state().rematch_requests, vec![false, false]);

    for (turn, (row, col)) in [(0, 0), (1, 0), (0, 1), (1, 2)].into_iter().enumerate() {
        sessions[(turn + 1) % 2].click(Position::new(row, col)).await.unwrap();
        sync_all(&mut sessions);
    }
    assert_eq!(sessions[1].state().winner, Some(0));

    sessions[0].request_rematch().await.unwrap();
    sync_all(&mut sessions);
    assert_eq!(sessions[1].state().rematch_requests, vec![true, false]);
}

#[tokio::test]
async fn lagging_session_catches_up_with_the_last_row() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 2), 2).await;
    let game_id = sessions[0].online_state().game_id.clone().unwrap();

    for round in 0..CHANNEL_BUFFER_SIZE + 10 {
        let votes = vec![round % 2 == 0, round % 3 == 0];
        store
            .update_game(&game_id, RowPatch::RematchVotes(votes))
            .await
            .unwrap();
    }
    let result = process_move(&sessions[1].state().board, Position::new(2, 2), 0, 3, 2, None);
    let last = store
        .update_game(&game_id, RowPatch::Move(result.into()))
        .await
        .unwrap();

    let applied = sessions[1].poll_updates().unwrap();
    assert!(applied <= CHANNEL_BUFFER_SIZE);
    let state = sessions[1].state();
    assert_eq!(state.board, last.board);
    assert_eq!(state.current_player, last.current_player);
    assert_eq!(state.rematch_requests, last.rematch_requests);
    assert_eq!(sessions[1].online_state().status, OnlineStatus::Playing);
}

#[tokio::test]
async fn three_player_win_and_rematch() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 3), 3).await;
    assert!(sessions.iter().all(|s| s.online_state().status == OnlineStatus::Playing));

    let moves = [(0, 0), (1, 0), (2, 1), (0, 1), (1, 1), (2, 2), (0, 2)];
    for (turn, (row, col)) in moves.into_iter().enumerate() {
        sessions[turn % 3].click(Position::new(row, col)).await.unwrap();
        sync_all(&mut sessions);
    }
    for session in &sessions {
        assert_eq!(session.state().winner, Some(0));
        assert_eq!(session.state().winning_cells.len(), 3);
        assert_eq!(session.online_state().status, OnlineStatus::Finished);
    }

    sessions[0].request_rematch().await.unwrap();
    sync_all(&mut sessions);
    assert_eq!(sessions[2].rematch_info().others_count, 1);

    // Player 1 has not voted yet, so the vote of player 2 is only recorded.
    sessions[2].request_rematch().await.unwrap();
    sync_all(&mut sessions);
    assert_eq!(sessions[1].state().rematch_requests, vec![true, false, true]);
    assert_eq!(sessions[1].state().winner, Some(0));
    assert!(sessions[1].rematch_info().all_others_want);

    // Everybody else agreed: the last vote resets the game.
    sessions[1].request_rematch().await.unwrap();
    sync_all(&mut sessions);
    for session in &sessions {
        let state = session.state();
        assert_eq!(state.winner, None);
        assert!(state.winning_cells.is_empty());
        assert_eq!(state.current_player, 0);
        assert_eq!(state.rematch_requests, vec![false, false, false]);
        assert!(state.board.positions().all(|p| state.board.is_empty_at(p)));
        assert_eq!(session.online_state().status, OnlineStatus::Playing);
    }
}

#[tokio::test]
async fn failed_write_leaves_local_state() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 2), 2).await;
    let game_id = sessions[0].online_state().game_id.clone().unwrap();
    let before = sessions[0].state();

    assert!(store.remove_game(&game_id).await);
    assert!(matches!(
        sessions[0].make_move(Position::new(1, 1), None).await,
        Err(OnlineError::GameNotFound(_))
    ));
    assert_eq!(*sessions[0].state(), *before);

    assert!(matches!(
        sessions[0].poll_updates(),
        Err(OnlineError::Disconnected)
    ));
    assert_eq!(sessions[0].online_state().status, OnlineStatus::Error);
}

#[tokio::test]
async fn next_update_waits_for_the_row() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 2), 2).await;

    sessions[0].click(Position::new(2, 2)).await.unwrap();
    let state = sessions[1].next_update().await.unwrap();
    assert_eq!(state.board.get(Position::new(2, 2)), Some(CellContent::Piece(0)));
    assert!(sessions[1].is_my_turn());
}

#[tokio::test]
async fn leaving_forgets_the_seat() {
    let store = Arc::new(MemoryStore::new());
    let mut sessions = seated(&store, &config(3, 3, 3, 2), 2).await;
    sessions[1].leave();
    assert_eq!(sessions[1].online_state().game_id, None);
    assert_eq!(sessions[1].shareable_link("http://host"), None);
    assert!(matches!(
        sessions[1].click(Position::new(0, 0)).await,
        Err(OnlineError::NotInGame)
    ));
    assert!(matches!(sessions[1].poll_updates(), Err(OnlineError::NotInGame)));
}
