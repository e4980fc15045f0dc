//! Deploy sessions: stepwise deployment, undo, cancel, and commit.

use super::sq;
use crate::game::deploy::{DeployRequest, DeployStep};
use crate::game::state::Game;
use crate::game::types::{Color, MoveQuery, PieceKind};

fn tank_infantry_at_c5() -> Game {
    Game::from_fen("11/11/11/11/11/11/11/2(TI)8/11/11/11/6C4 r - - 0 1").unwrap()
}

fn navy_stack_at_b5() -> Game {
    Game::from_fen("11/11/11/11/11/11/11/1(NTI)9/11/11/11/6C4 r - - 0 1").unwrap()
}

fn find_deploy(game: &mut Game, from: &str, kind: PieceKind, to: &str) -> crate::game::Move {
    game.moves(&MoveQuery {
        square: Some(sq(from)),
        kind: Some(kind),
    })
    .iter()
    .copied()
    .find(|m| m.deploy && m.to == sq(to))
    .unwrap_or_else(|| panic!("no deploy move {kind} {from}->{to}"))
}

#[test]
fn test_first_step_opens_session() {
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));

    let session = game.active_deploy().unwrap();
    assert_eq!(session.stack_square(), sq("c5"));
    assert_eq!(session.turn(), Color::Red);
    assert_eq!(session.remaining(), vec![PieceKind::Tank]);
    // the turn does not pass mid-session
    assert_eq!(game.turn(), Color::Red);
    assert_eq!(game.get(sq("c6")).unwrap().kind, PieceKind::Infantry);
    assert_eq!(game.get(sq("c5")).unwrap().kind, PieceKind::Tank);
}

#[test]
fn test_session_undo_step_by_step() {
    let mut game = tank_infantry_at_c5();
    let before = game.fen();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));
    assert!(game.active_deploy().is_some());

    assert!(game.undo());
    assert!(game.active_deploy().is_none());
    assert_eq!(game.fen(), before);
}

#[test]
fn test_explicit_commit_flips_turn() {
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));
    assert!(game.commit_deploy(true));

    assert!(game.active_deploy().is_none());
    assert_eq!(game.turn(), Color::Blue);
    assert_eq!(game.history().len(), 1);
    // the tank stayed behind
    assert_eq!(game.get(sq("c5")).unwrap().kind, PieceKind::Tank);
    // stay prefix names it in the sequence notation
    assert_eq!(game.history()[0].san, "T<I>c6");
}

#[test]
fn test_commit_without_turn_switch() {
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));
    assert!(game.commit_deploy(false));
    assert_eq!(game.turn(), Color::Red);
}

#[test]
fn test_cancel_restores_position() {
    let mut game = navy_stack_at_b5();
    let before = game.fen();
    let mv = find_deploy(&mut game, "b5", PieceKind::Tank, "c5");
    assert!(game.make_move(mv));
    let mv = find_deploy(&mut game, "b5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));

    assert!(game.cancel_deploy());
    assert!(game.active_deploy().is_none());
    assert_eq!(game.fen(), before);
    assert!(game.history().is_empty());
}

#[test]
fn test_carrier_leaving_commits() {
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));

    // a non-deploy tank move from the stack square ends the turn
    let carrier_moves = game.moves(&MoveQuery {
        square: Some(sq("c5")),
        kind: Some(PieceKind::Tank),
    });
    let leave = carrier_moves
        .iter()
        .copied()
        .find(|m| !m.deploy && m.to == sq("c4"))
        .unwrap();
    assert!(game.make_move(leave));

    assert!(game.active_deploy().is_none());
    assert_eq!(game.turn(), Color::Blue);
    assert_eq!(game.history().len(), 1);
    assert!(game.get(sq("c5")).is_none());
}

#[test]
fn test_deploying_everything_auto_commits() {
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Tank, "c6");
    assert!(game.make_move(mv));
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c4");
    assert!(game.make_move(mv));

    assert!(game.active_deploy().is_none());
    assert_eq!(game.turn(), Color::Blue);
    assert!(game.get(sq("c5")).is_none());
}

#[test]
fn test_deploy_moves_limited_to_session_square() {
    let mut game =
        Game::from_fen("11/11/11/11/11/11/11/2(TI)8/11/11/11/(NT)5C4 r - - 0 1").unwrap();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));

    // with the session open at c5, the navy stack at a1 may not move
    let legal = game.legal_moves();
    assert!(legal.iter().all(|m| m.from == sq("c5")));
}

#[test]
fn test_deploy_request_runs_whole_turn() {
    let mut game = navy_stack_at_b5();
    let applied = game
        .deploy_move(&DeployRequest {
            from: Some(sq("b5")),
            moves: vec![
                DeployStep {
                    piece: PieceKind::Tank,
                    to: sq("c5"),
                },
                DeployStep {
                    piece: PieceKind::Infantry,
                    to: sq("c5"),
                },
            ],
            stay: vec![PieceKind::Navy],
        })
        .unwrap();
    assert_eq!(applied.len(), 2);
    assert!(game.active_deploy().is_none());
    assert_eq!(game.turn(), Color::Blue);
    assert_eq!(game.get(sq("b5")).unwrap().kind, PieceKind::Navy);
    let landed = game.get(sq("c5")).unwrap();
    assert_eq!(landed.kind, PieceKind::Tank);
    assert_eq!(landed.carried.len(), 1);
}

#[test]
fn test_deploy_request_failure_rolls_back() {
    let mut game = navy_stack_at_b5();
    let before = game.fen();
    let err = game.deploy_move(&DeployRequest {
        from: Some(sq("b5")),
        moves: vec![
            DeployStep {
                piece: PieceKind::Tank,
                to: sq("c5"),
            },
            // infantry cannot reach f9 in one step
            DeployStep {
                piece: PieceKind::Infantry,
                to: sq("f9"),
            },
        ],
        stay: vec![],
    });
    assert!(err.is_err());
    assert_eq!(game.fen(), before);
    assert!(game.active_deploy().is_none());
}

#[test]
fn test_deploy_capture_resets_half_move_clock() {
    let mut game =
        Game::from_fen("11/11/11/11/11/11/2m8/2(TI)8/11/11/11/6C4 r - - 7 4 ").unwrap();
    // the tank deploys onto the blue militia at c6
    let mv = find_deploy(&mut game, "c5", PieceKind::Tank, "c6");
    assert!(game.make_move(mv));
    assert!(game.commit_deploy(true));
    assert_eq!(game.half_moves(), 0);

    let mut quiet = tank_infantry_at_c5();
    let mv = find_deploy(&mut quiet, "c5", PieceKind::Infantry, "c6");
    assert!(quiet.make_move(mv));
    assert!(quiet.commit_deploy(true));
    assert_eq!(quiet.half_moves(), 1);
}

#[test]
fn test_stranded_navy_cannot_move_but_cargo_deploys() {
    let mut game =
        Game::from_fen("11/11/11/11/11/11/11/11/11/11/11/6C4 r - - 0 1").unwrap();
    let stack = crate::game::combine(&[
        crate::game::Piece::new(PieceKind::Navy, Color::Red),
        crate::game::Piece::new(PieceKind::Tank, Color::Red),
    ])
    .unwrap();
    // dry land under a navy hull can only arise mid-deploy; force it
    game.board[sq("e4").as_index()] = Some(stack);
    game.refresh_indices();
    game.reseed_position_counts();

    let moves = game.moves(&MoveQuery::from_square(sq("e4")));
    assert!(moves.iter().all(|m| m.piece != PieceKind::Navy));
    assert!(moves
        .iter()
        .any(|m| m.deploy && m.piece == PieceKind::Tank));
}

#[test]
fn test_deploy_recombine_after_split() {
    // tank out first, infantry follows onto the same square
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Tank, "c6");
    assert!(game.make_move(mv));
    let recombine = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert_eq!(recombine.kind, crate::game::MoveKind::Combination);
    assert!(game.make_move(recombine));

    // everything left the square, so the session committed
    assert!(game.active_deploy().is_none());
    assert_eq!(game.turn(), Color::Blue);
    let stack = game.get(sq("c6")).unwrap();
    assert_eq!(stack.kind, PieceKind::Tank);
    assert_eq!(stack.carried.len(), 1);
}

#[test]
fn test_session_survives_legality_probing() {
    let mut game = tank_infantry_at_c5();
    let mv = find_deploy(&mut game, "c5", PieceKind::Infantry, "c6");
    assert!(game.make_move(mv));

    let before_commands = game.active_deploy().unwrap().commands().len();
    let _ = game.legal_moves();
    assert_eq!(
        game.active_deploy().unwrap().commands().len(),
        before_commands
    );
    assert_eq!(game.active_deploy().unwrap().stack_square(), sq("c5"));
}
