//! FEN serialization round-trips.

use super::sq;
use crate::game::fen::DEFAULT_POSITION;
use crate::game::state::Game;
use crate::game::types::{Color, Piece, PieceKind};
use crate::game::{combine, FenError};

#[test]
fn test_default_position_round_trip() {
    let game = Game::new();
    assert_eq!(game.fen(), DEFAULT_POSITION);
    let reloaded = Game::from_fen(&game.fen()).unwrap();
    assert_eq!(reloaded.fen(), DEFAULT_POSITION);
}

#[test]
fn test_default_position_contents() {
    let game = Game::new();
    assert_eq!(game.turn(), Color::Red);
    assert_eq!(game.half_moves(), 0);
    assert_eq!(game.move_number(), 1);
    assert_eq!(game.commander(Color::Red), Some(sq("g1")));
    assert_eq!(game.commander(Color::Blue), Some(sq("g12")));
    let c5 = game.get(sq("c5")).unwrap();
    assert_eq!(c5.kind, PieceKind::Infantry);
    assert_eq!(c5.color, Color::Red);
}

#[test]
fn test_empty_rows_round_trip() {
    let fen = "11/11/11/11/11/11/11/11/11/11/11/6C4 r - - 0 1";
    let game = Game::from_fen(fen).unwrap();
    assert_eq!(game.fen(), fen);
}

#[test]
fn test_stack_round_trip() {
    let fen = "11/11/11/11/11/11/11/11/2(TI)8/11/11/6C4 r - - 0 1";
    let game = Game::from_fen(fen).unwrap();
    let stack = game.get(sq("c4")).unwrap();
    assert_eq!(stack.kind, PieceKind::Tank);
    assert_eq!(stack.carried.len(), 1);
    assert_eq!(game.fen(), fen);
}

#[test]
fn test_heroic_round_trip() {
    let fen = "11/11/11/11/11/11/11/11/3+T7/11/11/6C4 r - - 0 1";
    let game = Game::from_fen(fen).unwrap();
    assert!(game.get(sq("d4")).unwrap().heroic);
    assert_eq!(game.fen(), fen);
}

#[test]
fn test_heroic_stack_round_trip() {
    let fen = "11/11/11/11/11/11/11/11/2(+N+FI)8/11/11/6C4 r - - 0 1";
    let game = Game::from_fen(fen).unwrap();
    let stack = game.get(sq("c4")).unwrap();
    assert!(stack.heroic);
    assert!(stack.carried[0].heroic);
    assert!(!stack.carried[1].heroic);
    assert_eq!(game.fen(), fen);
}

#[test]
fn test_clocks_parsed() {
    let fen = "11/11/11/11/11/11/11/11/11/11/11/6C4 b - - 42 17";
    let game = Game::from_fen(fen).unwrap();
    assert_eq!(game.turn(), Color::Blue);
    assert_eq!(game.half_moves(), 42);
    assert_eq!(game.move_number(), 17);
}

#[test]
fn test_bad_rank_count() {
    let err = Game::from_fen("11/11 r - - 0 1").unwrap_err();
    assert_eq!(err, FenError::BadRankCount { found: 2 });
}

#[test]
fn test_bad_rank_width() {
    let err =
        Game::from_fen("12/11/11/11/11/11/11/11/11/11/11/11 r - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::BadRankWidth { .. }));
}

#[test]
fn test_invalid_piece() {
    let err =
        Game::from_fen("10z/11/11/11/11/11/11/11/11/11/11/11 r - - 0 1").unwrap_err();
    assert_eq!(err, FenError::InvalidPiece { char: 'z' });
}

#[test]
fn test_invalid_turn() {
    let err =
        Game::from_fen("11/11/11/11/11/11/11/11/11/11/11/11 w - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::InvalidSideToMove { .. }));
}

#[test]
fn test_duplicate_commander_rejected() {
    let err =
        Game::from_fen("6C4/11/11/11/11/11/11/11/11/11/11/6C4 r - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::DuplicateCommander { .. }));
}

#[test]
fn test_navy_on_land_rejected() {
    let err =
        Game::from_fen("11/11/11/11/11/11/11/11/5N5/11/11/6C4 r - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::BadTerrain { .. }));
}

#[test]
fn test_land_piece_on_water_rejected() {
    let err =
        Game::from_fen("11/11/11/11/11/11/11/11/T10/11/11/6C4 r - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::BadTerrain { .. }));
}

#[test]
fn test_invalid_stack_rejected() {
    // infantry cannot carry a tank
    let err =
        Game::from_fen("11/11/11/11/11/11/11/11/2(IT)8/11/11/6C4 r - - 0 1").unwrap_err();
    assert!(matches!(err, FenError::InvalidStack { .. }));
}

#[test]
fn test_load_failure_leaves_state_unchanged() {
    let mut game = Game::new();
    let before = game.fen();
    assert!(game.load("garbage").is_err());
    assert_eq!(game.fen(), before);
}

#[test]
fn test_load_replaces_state() {
    let mut game = Game::new();
    game.load("11/11/11/11/11/11/11/11/11/11/11/6C4 b - - 3 9").unwrap();
    assert_eq!(game.turn(), Color::Blue);
    assert!(game.history().is_empty());
    assert_eq!(game.get(sq("c5")), None);
}

#[test]
fn test_put_remove_reflected_in_fen() {
    let mut game = Game::from_fen("11/11/11/11/11/11/11/11/11/11/11/6C4 r - - 0 1").unwrap();
    let stack = combine(&[
        Piece::new(PieceKind::Navy, Color::Red),
        Piece::new(PieceKind::Tank, Color::Red),
    ])
    .unwrap();
    assert!(game.put(stack, sq("b5"), false));
    assert_eq!(
        game.fen(),
        "11/11/11/11/11/11/11/1(NT)9/11/11/11/6C4 r - - 0 1"
    );
    game.remove(sq("b5"));
    assert_eq!(game.fen(), "11/11/11/11/11/11/11/11/11/11/11/6C4 r - - 0 1");
}

#[test]
fn test_deploy_suffix_round_trip() {
    let mut game =
        Game::from_fen("11/11/11/11/11/11/11/11/2(TI)8/11/11/6C4 r - - 0 1").unwrap();
    let mv = game
        .moves(&crate::game::MoveQuery {
            square: Some(sq("c4")),
            kind: Some(PieceKind::Tank),
        })
        .iter()
        .copied()
        .find(|m| m.deploy && m.to == sq("c5"))
        .unwrap();
    assert!(game.make_move(mv));
    let fen = game.fen();
    assert!(fen.contains("DEPLOY c4:"), "fen was {fen}");

    let restored = Game::from_fen(&fen).unwrap();
    assert_eq!(restored.fen(), fen);
    let session = restored.active_deploy().unwrap();
    assert_eq!(session.stack_square(), sq("c4"));
    assert_eq!(session.commands().len(), 1);
    assert_eq!(restored.get(sq("c5")).unwrap().kind, PieceKind::Tank);
    assert_eq!(restored.get(sq("c4")).unwrap().kind, PieceKind::Infantry);
}
