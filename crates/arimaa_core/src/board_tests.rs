use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn pos(side: Color, text: &str) -> Position {
    Position::from_placement_str(side, 4, text).unwrap()
}

#[test]
fn basic_setup_short_string() {
    let p = Position::basic_setup();
    assert_eq!(
        p.to_short_str(),
        "[rrrrrrrrdhcemchd                                DHCMECHDRRRRRRRR]"
    );
    let back = Position::parse_short(Color::Gold, 4, &p.to_short_str()).unwrap();
    assert_eq!(back, p);
    assert_eq!(back.hash(), p.hash());
}

#[test]
fn parse_short_rejects_malformed_input() {
    assert!(matches!(
        Position::parse_short(Color::Gold, 4, "rrrr"),
        Err(PositionError::MissingBrackets(_))
    ));
    assert_eq!(
        Position::parse_short(Color::Gold, 4, "[rr]").unwrap_err(),
        PositionError::BadLength(2)
    );
    let bad = format!("[{}q]", " ".repeat(63));
    assert_eq!(
        Position::parse_short(Color::Gold, 4, &bad).unwrap_err(),
        PositionError::BadPiece('q')
    );
    assert_eq!(
        Position::parse_short(Color::Gold, 0, "[]").unwrap_err(),
        PositionError::BadStepsLeft(0)
    );
}

#[test]
fn freezing_needs_stronger_enemy_and_no_friend() {
    let p = pos(Color::Gold, "Rd4 cd5");
    assert!(p.is_frozen_at(27));
    // the cat is not frozen by a weaker rabbit
    assert!(!p.is_frozen_at(35));

    let supported = pos(Color::Gold, "Rd4 Cc4 cd5");
    assert!(!supported.is_frozen_at(27));
}

#[test]
fn unsupported_trap_occupant_is_captured() {
    let mut p = pos(Color::Gold, "Rc3 Dc2 re7");
    let captured = p.apply_step(Step::new(10, 9));
    assert_eq!(
        captured,
        Some((18, Piece::new(Color::Gold, PieceKind::Rabbit)))
    );
    assert!(p.is_empty(18));
    assert_eq!(p.steps_left, 3);
}

#[test]
fn basic_setup_has_only_forward_steps() {
    // Only the second-rank pieces can step, one square north each.
    let p = Position::basic_setup();
    assert_eq!(p.legal_step_count(), 8);
}

#[test]
fn pushes_and_pulls_are_generated() {
    let p = pos(Color::Gold, "Ed4 rd5 Ra1");
    let elephant: Vec<Action> = p
        .actions()
        .into_iter()
        .filter(|a| a.steps().iter().any(|s| s.from == 27 || s.to == 27))
        .collect();
    let pushes = elephant.iter().filter(|a| matches!(a, Action::Push(_))).count();
    let pulls = elephant.iter().filter(|a| matches!(a, Action::Pull(_))).count();
    let steps = elephant.iter().filter(|a| matches!(a, Action::Step(_))).count();
    assert_eq!((steps, pushes, pulls), (3, 3, 3));

    let mut one_step_left = p.clone();
    one_step_left.steps_left = 1;
    assert!(
        one_step_left
            .actions()
            .iter()
            .all(|a| matches!(a, Action::Step(_)))
    );
}

#[test]
fn strict_moves_follow_the_rules() {
    let setup = Position::basic_setup();
    let after = setup.do_move_str("Ee2n Ee3n Ee4n Ee5n", true).unwrap();
    assert_eq!(after.side_to_move, Color::Silver);
    assert_eq!(after.steps_left, 4);
    assert_eq!(
        after.piece_at(44),
        Some(Piece::new(Color::Gold, PieceKind::Elephant))
    );

    assert!(matches!(
        setup.do_move_str("Ra1n", true),
        Err(MoveError::Occupied(_))
    ));
    assert_eq!(
        setup.do_move_str("Ee2n Ee3s", true).unwrap_err(),
        MoveError::NoChange
    );
    assert_eq!(
        setup
            .do_move_str("Ee2n Ee3n Ee4n Ee5w Ed5w", true)
            .unwrap_err(),
        MoveError::TooManySteps(4)
    );
    assert!(matches!(
        setup.do_move_str("Ea1n", true),
        Err(MoveError::PieceMismatch(_))
    ));
}

#[test]
fn rabbits_and_frozen_pieces_cannot_step() {
    let p = pos(Color::Gold, "Ra4 Rd4 cd5 rh8");
    assert!(matches!(
        p.do_move_str("Ra4s", true),
        Err(MoveError::RabbitBackward(_))
    ));
    assert!(matches!(
        p.do_move_str("Rd4e", true),
        Err(MoveError::Frozen(_))
    ));
    // non-strict play does not check the rules
    assert!(p.do_move_str("Ra4s", false).is_ok());
}

#[test]
fn steps_onto_occupied_squares_are_rejected() {
    let p = pos(Color::Gold, "Ed4 rd5 Ra1 rh8");
    for strict in [true, false] {
        assert!(matches!(
            p.do_move_str("Ed4n", strict),
            Err(MoveError::Occupied(_))
        ));
    }
    // the push frees d5 before the elephant moves in
    assert!(p.do_move_str("rd5n Ed4n", false).is_ok());
}

#[test]
fn push_and_pull_validation() {
    let p = pos(Color::Gold, "Ed4 rd5 Cb4 db5 Ra1 rh8");
    assert!(p.do_move_str("rd5n Ed4n", true).is_ok());
    assert!(p.do_move_str("Ed4s rd5s", true).is_ok());
    assert!(matches!(
        p.do_move_str("rd5n", true),
        Err(MoveError::IncompletePush(_))
    ));
    // a cat cannot displace a dog
    assert!(matches!(
        p.do_move_str("db5n Cb4n", true),
        Err(MoveError::IllegalDisplacement(_))
    ));
}

#[test]
fn steps_to_str_reports_captures() {
    let p = pos(Color::Gold, "Rc3 Dc2 re7");
    let text = p.steps_to_str(&[Step::new(10, 9)]).unwrap();
    assert_eq!(text, "Dc2w Rc3x");

    // capture tokens are accepted when reading the move back
    let after = p.do_move_str(&text, true).unwrap();
    assert!(after.is_empty(18));
}

#[test]
fn lone_rabbit_move_count() {
    // 14 squares within four forward/sideways steps of a1, minus c3 which
    // captures the rabbit, plus the capture itself.
    let p = pos(Color::Gold, "Ra1 rh8");
    let moves = p.get_moves();
    assert_eq!(moves.len(), 14);
    assert!(moves.iter().all(|(_, r)| r.side_to_move == Color::Silver));
    assert!(moves.iter().any(|(_, r)| r.pieces_of(Color::Gold, PieceKind::Rabbit).is_empty()));
}

#[test]
fn generated_moves_replay_strictly() {
    let p = pos(Color::Gold, "Ed4 Md3 rd5 ce4 Ra1 rh8");
    for (steps, result) in p.get_moves() {
        let text = p.steps_to_str(&steps).unwrap();
        let replayed = p.do_move_str(&text, true).unwrap();
        assert_eq!(replayed, result, "move {text}");
    }
}

#[test]
fn random_moves_are_legal() {
    let mut rng = StdRng::seed_from_u64(7);
    let start = Position::basic_setup();
    let mut p = start.clone();
    for _ in 0..40 {
        if p.end_state().is_some() {
            break;
        }
        let (steps, result) = p.random_step_move(&mut rng).expect("position is not immobilized");
        assert!((1..=4).contains(&steps.len()));
        let text = p.steps_to_str(&steps).unwrap();
        let replayed = p.do_move_str(&text, true).unwrap();
        assert_eq!(replayed, result);
        p = result;
    }
}

#[test]
fn immobilized_side_has_no_random_move() {
    let mut rng = StdRng::seed_from_u64(1);
    let p = pos(Color::Gold, "Ra1 ea2 rh8");
    assert!(p.random_step_move(&mut rng).is_none());
    assert_eq!(p.end_state(), Some(Color::Silver));
}

#[test]
fn end_state_goal_and_elimination() {
    assert_eq!(pos(Color::Silver, "Ra8 rh7").end_state(), Some(Color::Gold));
    assert_eq!(pos(Color::Gold, "Ra7 rh1").end_state(), Some(Color::Silver));
    // both reached goal: the player who just moved wins
    assert_eq!(pos(Color::Silver, "Ra8 rh1").end_state(), Some(Color::Gold));
    assert_eq!(pos(Color::Silver, "Ed4 rh7").end_state(), Some(Color::Silver));
    assert_eq!(pos(Color::Gold, "Ra2 ed7").end_state(), Some(Color::Gold));
    assert_eq!(Position::basic_setup().end_state(), None);
}

#[test]
fn setup_moves_place_pieces() {
    let basic = Position::basic_setup();
    let empty = Position::empty(Color::Gold, 4);

    let gold_done = empty
        .do_move_str(&basic.placing_move(Color::Gold), true)
        .unwrap();
    assert_eq!(gold_done.side_to_move, Color::Silver);
    let both_done = gold_done
        .do_move_str(&basic.placing_move(Color::Silver), true)
        .unwrap();
    assert!(both_done.same_board(&basic));
    assert_eq!(both_done.side_to_move, Color::Gold);

    // gold may not place on silver's ranks
    assert!(matches!(
        empty.do_move_str("Ra8", true),
        Err(MoveError::BadSetup(_))
    ));
}

#[test]
fn hash_is_incremental() {
    let mut p = pos(Color::Gold, "Ed4 rd5 Ra1");
    p.apply_step(Step::new(27, 26));
    let fresh = Position::from_placement_str(Color::Gold, 3, "Ec4 rd5 Ra1").unwrap();
    assert_eq!(p.hash(), fresh.hash());

    p.pass_turn();
    let passed = Position::from_placement_str(Color::Silver, 4, "Ec4 rd5 Ra1").unwrap();
    assert_eq!(p.hash(), passed.hash());
}

#[test]
fn parse_steps_reads_notation() {
    assert_eq!(
        Position::parse_steps("Dc2w Rc3x Ee2n").unwrap(),
        vec![Step::new(10, 9), Step::new(12, 20)]
    );
    assert_eq!(Position::parse_steps("").unwrap_err(), MoveError::Empty);
    assert!(matches!(
        Position::parse_steps("Ra1 Ee2n"),
        Err(MoveError::MixedTokens(_))
    ));
    assert!(matches!(
        Position::parse_steps("Ra1w"),
        Err(MoveError::BadToken(_))
    ));
}
