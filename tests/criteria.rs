use dutch_pairing::{Colour, Criteria, FloatStatus, PlayerCard};

fn player(no: u32) -> PlayerCard {
    PlayerCard::new(format!("Player {no}"), 1500 + no, no)
}

fn with_colours(no: u32, score: f64, colours: &[Colour]) -> PlayerCard {
    let mut p = player(no);
    p.score = score;
    p.colour_hist = colours.to_vec();
    p.opponents = (100..100 + colours.len() as u32).collect();
    p
}

#[test]
fn repeat_opponents_and_byes_are_blocked() {
    let c = Criteria::new(2, false);
    let mut a = player(1);
    let b = player(2);

    assert!(c.b1a(&a, &b));
    a.opponents.push(2);
    assert!(!c.b1a(&a, &b));

    let mut d = player(3);
    assert!(c.b1b(&d));
    d.bye(1.0);
    assert!(!c.b1b(&d));
}

#[test]
fn same_side_absolute_preferences_cannot_meet() {
    // Round 2: the absolute threshold is 2.
    let c = Criteria::new(2, false);
    let strong_w1 = with_colours(1, 1.0, &[Colour::White, Colour::White]);
    let strong_w2 = with_colours(2, 1.0, &[Colour::White, Colour::White]);
    let strong_b = with_colours(3, 1.0, &[Colour::Black, Colour::Black]);
    let mild_w = with_colours(4, 1.0, &[Colour::White, Colour::Black, Colour::White]);

    assert!(!c.b2(&strong_w1, &strong_w2));
    assert!(c.b2(&strong_w1, &strong_b));
    assert!(c.b2(&strong_w1, &mild_w));
    assert!(!c.compatible(&strong_w1, &strong_w2));
}

#[test]
fn odd_rounds_treat_mild_preferences_as_absolute() {
    let mut c = Criteria::new(3, false);
    let mild_w1 = with_colours(1, 1.0, &[Colour::White, Colour::Black, Colour::White]);
    let mild_w2 = with_colours(2, 1.0, &[Colour::White, Colour::Black, Colour::White]);

    assert!(!c.b2(&mild_w1, &mild_w2));
    c.a7d = false;
    assert!(c.b2(&mild_w1, &mild_w2));
}

#[test]
fn final_round_top_scorer_escapes_b2() {
    let mut c = Criteria::new(5, true);
    let mut top = with_colours(1, 3.0, &[Colour::White, Colour::White]);
    top.opponents = vec![2, 3];
    let other = with_colours(2, 1.0, &[Colour::White, Colour::White]);

    // The exemption only opens once the shield is relaxed.
    assert!(!c.b2(&top, &other));
    c.b2_top_scorer = false;
    assert!(c.b2(&top, &other));

    // Neither player above half the maximum score: still blocked.
    let low = with_colours(3, 2.0, &[Colour::White, Colour::White]);
    assert!(!c.b2(&low, &other));
}

#[test]
fn b4_counts_coinciding_expected_colours() {
    let c = Criteria::new(4, false);
    let w1 = with_colours(1, 1.0, &[Colour::Black, Colour::White, Colour::White]);
    let w2 = with_colours(2, 1.0, &[Colour::White, Colour::Black, Colour::White]);
    let b1 = with_colours(3, 1.0, &[Colour::White, Colour::Black, Colour::Black]);
    let b2 = with_colours(4, 1.0, &[Colour::Black, Colour::White, Colour::Black]);

    assert_eq!(c.b4(&[(&w1, &b1), (&w2, &b2)]), 0);
    assert_eq!(c.b4(&[(&w1, &w2), (&b1, &b2)]), 2);
}

#[test]
fn float_protection_blocks_repeat_floats() {
    let mut c = Criteria::new(3, false);
    let higher = with_colours(1, 2.0, &[Colour::White, Colour::Black]);
    let mut lower = with_colours(2, 1.0, &[Colour::Black, Colour::White]);
    lower.float_status = FloatStatus::Up;

    assert!(!c.b5_pair(&higher, &lower));
    c.b5_up = false;
    assert!(c.b5_pair(&higher, &lower));

    lower.float_status = FloatStatus::UpPrev;
    assert!(!c.b6_pair(&higher, &lower));

    let mut floater = player(3);
    floater.float_status = FloatStatus::Down;
    assert!(!c.b5_floater(&floater));
    floater.float_status = FloatStatus::DownPrev;
    assert!(!c.b6_floater(&floater));
    floater.float_status = FloatStatus::None;
    assert!(c.b5_floater(&floater) && c.b6_floater(&floater));
}

#[test]
fn equal_scores_never_trip_float_protection() {
    let c = Criteria::new(3, false);
    let a = with_colours(1, 1.0, &[Colour::White, Colour::Black]);
    let mut b = with_colours(2, 1.0, &[Colour::Black, Colour::White]);
    b.float_status = FloatStatus::Up;

    assert!(c.b5_pair(&a, &b));
    assert!(c.b6_pair(&a, &b));
}

#[test]
fn satisfied_enforces_the_violation_budget() {
    let c = Criteria::new(4, false);
    let w1 = with_colours(1, 1.0, &[Colour::Black, Colour::White, Colour::White]);
    let w2 = with_colours(2, 1.0, &[Colour::White, Colour::Black, Colour::White]);
    let pairs = [(&w1, &w2)];

    assert!(!c.satisfied(&pairs, 0, None, None));
    assert!(c.satisfied(&pairs, 1, None, None));
}

#[test]
fn evaluation_is_pure_over_unchanged_state() {
    let c = Criteria::new(4, false);
    let w1 = with_colours(1, 1.0, &[Colour::Black, Colour::White, Colour::White]);
    let w2 = with_colours(2, 1.0, &[Colour::White, Colour::Black, Colour::White]);
    let b1 = with_colours(3, 1.0, &[Colour::White, Colour::Black, Colour::Black]);
    let pairs = [(&w1, &b1)];

    // Same cards, same flags: every evaluation reads back identically.
    assert_eq!(
        c.satisfied(&pairs, 0, Some(&w2), None),
        c.satisfied(&pairs, 0, Some(&w2), None)
    );
    assert_eq!(c.b2(&w1, &w2), c.b2(&w1, &w2));
    assert_eq!(c.b4(&pairs), c.b4(&pairs));
}

#[test]
fn satisfied_checks_the_bye_and_the_floater() {
    let c = Criteria::new(3, false);
    let mut byed = player(1);
    byed.bye(1.0);
    assert!(!c.satisfied(&[], 0, None, Some(&byed)));

    let mut floater = player(2);
    floater.float_status = FloatStatus::Down;
    assert!(!c.satisfied(&[], 0, Some(&floater), None));
    floater.float_status = FloatStatus::None;
    assert!(c.satisfied(&[], 0, Some(&floater), None));
}
