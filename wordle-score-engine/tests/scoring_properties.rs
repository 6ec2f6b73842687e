use wordle_score_engine::{
    DayOffset, Outcome, ScoreRecord, compute_score, decode, encode, parse_share_text,
};

fn solved(count: u8) -> Outcome {
    Outcome::solved(count).unwrap()
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn records() -> Vec<ScoreRecord> {
    vec![
        ScoreRecord::from([(1, solved(3))]),
        ScoreRecord::from([(1, solved(1)), (2, Outcome::Failed), (4, solved(6))]),
        ScoreRecord::from([(10, solved(1)), (11, Outcome::Failed), (13, Outcome::Failed), (14, solved(4))]),
        ScoreRecord::from([(3, Outcome::Failed), (4, Outcome::Failed)]),
        (20..40).map(|day| (day, solved(u8::try_from(day % 6).unwrap() + 1))).collect(),
    ]
}

#[test]
fn insertion_order_does_not_matter() {
    for record in records() {
        let reversed: ScoreRecord = record.entries().rev().collect();
        assert_eq!(compute_score(&record), compute_score(&reversed));
    }
}

#[test]
fn shifting_every_day_keeps_the_score() {
    for record in records() {
        let shifted: ScoreRecord = record.entries().map(|(day, o)| (day + 100, o)).collect();
        assert_eq!(compute_score(&record), compute_score(&shifted));
    }
}

#[test]
fn perfect_streak_scores_one_per_day() {
    let record: ScoreRecord = (1..=30).map(|day: DayOffset| (day, solved(1))).collect();
    let score = compute_score(&record);
    assert!(close(score.total_score, 30.0));
    assert!(close(score.score_per_day(), 1.0));
}

#[test]
fn unbroken_solves_score_their_sum() {
    let mixed = &records()[4];
    let sum: u32 = mixed
        .entries()
        .map(|(_, outcome)| match outcome {
            Outcome::Attempts(attempts) => u32::from(attempts.get()),
            Outcome::Failed => unreachable!("fixture has no fails"),
        })
        .sum();
    let score = compute_score(mixed);
    assert!(close(score.total_score, f64::from(sum)));
    assert_eq!(score.days_played, 20);
    assert_eq!(score.uncounted_fails, 0);
}

#[test]
fn appending_a_solve_never_lowers_total() {
    for record in records() {
        let before = compute_score(&record).total_score;
        let Some((_, last)) = record.span() else {
            continue;
        };
        let mut next = record.clone();
        next.insert(last + 1, solved(1));
        assert!(compute_score(&next).total_score >= before);
    }
}

#[test]
fn fails_then_gap_then_solve() {
    let score = compute_score(&records()[2]);
    assert!(close(score.total_score, 39.0));
    assert_eq!(score.uncounted_fails, 0);
    assert_eq!(score.days_played, 4);
}

#[test]
fn only_fails_is_all_uncounted() {
    let score = compute_score(&records()[3]);
    assert!(close(score.total_score, 0.0));
    assert_eq!(score.uncounted_fails, 2);
    assert_eq!(score.counted_days(), 0);
    assert!(close(score.score_per_day(), 0.0));
}

#[test]
fn backups_preserve_scores() {
    for record in records() {
        let restored = decode(encode(&record).as_str()).unwrap();
        assert_eq!(compute_score(&restored), compute_score(&record));
    }
}

#[test]
fn shared_result_lands_on_its_day() {
    let shared = parse_share_text("Wordle 1,234 X/6\n\n⬛⬛⬛⬛⬛").unwrap();
    assert_eq!(shared.day, 1234);
    assert_eq!(shared.outcome, Outcome::Failed);
    assert!(!shared.hard_mode);
}

#[test]
fn far_apart_days_from_a_backup_score_promptly() {
    let record = decode(r#"{"1": 1, "4294967295": 1}"#).unwrap();
    let score = compute_score(&record);
    assert!(score.total_score.is_infinite());
    assert_eq!(score.days_played, 2);
}
