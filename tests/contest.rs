use std::collections::HashMap;

use juryvote::{
    Contest, PointScale, ReviewAction, Roster, VoteError, VotePayload, VoteResponse,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A valid distribution for `voter`: every other roster school, handed the
/// scale values in roster order.
fn distribution_for(contest: &Contest, voter: &str) -> HashMap<String, i64> {
    let scale = contest.scale().values().to_vec();
    contest
        .roster()
        .iter()
        .filter(|s| !s.name().eq_ignore_ascii_case(voter))
        .zip(scale)
        .map(|(school, points)| (school.name().to_string(), i64::from(points)))
        .collect()
}

/// Run an application through moderation and hand back its voting code.
fn approved_code(contest: &mut Contest, school: &str, name: &str, email: &str) -> String {
    let id = contest
        .submit_application(school, name, email, Some("/uploads/foto-1.jpg".into()))
        .unwrap();
    contest
        .review_application(&id, school, ReviewAction::Approve, school)
        .unwrap()
        .expect("first approval issues a code")
}

#[test]
fn full_flow_from_application_to_result() {
    init_logging();
    let mut contest = Contest::reference();

    let code = approved_code(&mut contest, "Gent", "Janne", "janne@hogent.be");
    assert_eq!(contest.verify_code(&code).unwrap().name(), "Gent");

    let payload = VotePayload {
        code: Some(code),
        distribution: Some(distribution_for(&contest, "Gent")),
        ..Default::default()
    };
    let voter = contest.submit_vote(&payload).unwrap();
    assert_eq!(voter.name(), "Gent");

    // Gent's distribution gave Antwerpen 12 points; with a single ballot the
    // final result opens with Antwerpen on 12 and Gent on 0 somewhere below.
    let result = contest.final_result();
    assert_eq!(result[0].school.name(), "Antwerpen");
    assert_eq!(result[0].points, 12);
    assert!(result.iter().any(|s| s.school.name() == "Gent" && s.points == 0));
    assert_eq!(result.len(), contest.roster().len());
}

#[test]
fn closed_lines_reject_even_a_perfect_ballot() {
    init_logging();
    let mut contest = Contest::reference();
    let code = approved_code(&mut contest, "Leuven", "Sam", "sam@kuleuven.be");

    contest.set_lines_open(false);
    assert!(!contest.lines_open());

    let payload = VotePayload {
        code: Some(code.clone()),
        distribution: Some(distribution_for(&contest, "Leuven")),
        ..Default::default()
    };
    assert_eq!(contest.submit_vote(&payload), Err(VoteError::VotingClosed));

    // Reopening lets the same payload through: the gate spent nothing.
    contest.set_lines_open(true);
    assert!(contest.submit_vote(&payload).is_ok());
}

#[test]
fn a_code_is_spent_by_acceptance_not_by_attempts() {
    init_logging();
    let mut contest = Contest::reference();
    let code = approved_code(&mut contest, "Utrecht", "Noor", "noor@hu.nl");

    // A malformed submission is rejected and must not burn the code.
    let mut broken = distribution_for(&contest, "Utrecht");
    broken.insert("Gent".into(), 12); // second 12, drops the uniqueness
    let payload = VotePayload {
        code: Some(code.clone()),
        distribution: Some(broken),
        ..Default::default()
    };
    assert_eq!(
        contest.submit_vote(&payload),
        Err(VoteError::MalformedPointSet)
    );

    // The corrected ballot goes through on the same code.
    let payload = VotePayload {
        code: Some(code.clone()),
        distribution: Some(distribution_for(&contest, "Utrecht")),
        ..Default::default()
    };
    assert!(contest.submit_vote(&payload).is_ok());

    // Second redemption of the spent code fails, valid ballot or not.
    assert_eq!(
        contest.submit_vote(&payload),
        Err(VoteError::InvalidOrUsedCode)
    );
}

#[test]
fn self_vote_is_rejected_through_the_full_stack() {
    init_logging();
    let mut contest = Contest::reference();
    let code = approved_code(&mut contest, "Arnhem", "Kim", "kim@artez.nl");

    let mut distribution = distribution_for(&contest, "Arnhem");
    // Swap one recipient for the voter's own school, keeping the values.
    let (victim, points) = distribution.iter().next().map(|(k, v)| (k.clone(), *v)).unwrap();
    distribution.remove(&victim);
    distribution.insert("arnhem".into(), points);

    let payload = VotePayload {
        code: Some(code),
        distribution: Some(distribution),
        ..Default::default()
    };
    let err = contest.submit_vote(&payload).unwrap_err();
    assert_eq!(err.kind(), "self_vote");
}

#[test]
fn direct_school_submission_uses_last_write_wins() {
    init_logging();
    let roster = Roster::new(&["A", "B", "C"]);
    let mut contest = Contest::new(roster, PointScale::new(vec![2, 0]));

    let first = VotePayload {
        school: Some("A".into()),
        distribution: Some(HashMap::from([("B".into(), 2), ("C".into(), 0)])),
        ..Default::default()
    };
    let second = VotePayload {
        school: Some("A".into()),
        distribution: Some(HashMap::from([("B".into(), 0), ("C".into(), 2)])),
        ..Default::default()
    };
    contest.submit_vote(&first).unwrap();
    contest.submit_vote(&second).unwrap();

    assert_eq!(contest.ledger().len(), 1);
    let a = contest.roster().resolve("A").unwrap();
    let c = contest.roster().resolve("C").unwrap();
    assert_eq!(contest.ledger().latest(&a).unwrap().points_for(&c), Some(2));
}

#[test]
fn payload_without_code_or_school_is_rejected() {
    init_logging();
    let mut contest = Contest::reference();
    let payload = VotePayload {
        distribution: Some(distribution_for(&contest, "Gent")),
        ..Default::default()
    };
    assert_eq!(
        contest.submit_vote(&payload),
        Err(VoteError::MissingField { field: "code" })
    );
}

#[test]
fn three_school_scenario_through_the_contest() {
    init_logging();
    let roster = Roster::new(&["A", "B", "C"]);
    let mut contest = Contest::new(roster, PointScale::new(vec![2, 0]));

    for (school, distribution) in [
        ("A", HashMap::from([("B".to_string(), 2), ("C".to_string(), 0)])),
        ("B", HashMap::from([("A".to_string(), 0), ("C".to_string(), 2)])),
    ] {
        let payload = VotePayload {
            school: Some(school.into()),
            distribution: Some(distribution),
            ..Default::default()
        };
        contest.submit_vote(&payload).unwrap();
    }

    let rankings = contest.jury_rankings();
    let a = contest.roster().resolve("A").unwrap();
    let b = contest.roster().resolve("B").unwrap();
    let c = contest.roster().resolve("C").unwrap();
    assert_eq!(rankings[&a][&b], 2);
    assert_eq!(rankings[&a][&c], 0);
    assert_eq!(rankings[&b][&a], 0);
    assert_eq!(rankings[&b][&c], 2);

    // B and C tie on 2; roster order puts B first. A shows up with 0.
    let result = contest.final_result();
    let rows: Vec<(&str, u32)> = result.iter().map(|s| (s.school.name(), s.points)).collect();
    assert_eq!(rows, vec![("B", 2), ("C", 2), ("A", 0)]);
}

#[test]
fn reset_wipes_votes_applications_and_codes() {
    init_logging();
    let mut contest = Contest::reference();
    let code = approved_code(&mut contest, "Tilburg", "Jip", "jip@fontys.nl");

    let payload = VotePayload {
        code: Some(code.clone()),
        distribution: Some(distribution_for(&contest, "Tilburg")),
        ..Default::default()
    };
    contest.submit_vote(&payload).unwrap();
    assert_eq!(contest.ledger().len(), 1);

    contest.reset();
    assert!(contest.ledger().is_empty());
    assert!(contest.registry().is_empty());
    assert_eq!(contest.verify_code(&code), Err(VoteError::InvalidOrUsedCode));
    assert!(contest.final_result().iter().all(|s| s.points == 0));
}

#[test]
fn moderation_views_are_scoped_and_grouped() {
    init_logging();
    let mut contest = Contest::reference();
    contest
        .submit_application("Gent", "Janne", "janne@hogent.be", None)
        .unwrap();
    contest
        .submit_application("gent", "Lotte", "lotte@hogent.be", None)
        .unwrap();
    contest
        .submit_application("Leuven", "Sam", "sam@kuleuven.be", None)
        .unwrap();

    assert_eq!(contest.applications_for("GENT").unwrap().len(), 2);
    assert_eq!(contest.applications_for("Leuven").unwrap().len(), 1);
    assert_eq!(
        contest.applications_for("Amsterdam"),
        Err(VoteError::UnknownSchool {
            name: "Amsterdam".to_string()
        })
    );

    let overview = contest.overview();
    assert_eq!(overview.len(), contest.roster().len());
    let gent_row = overview
        .iter()
        .find(|(school, _)| school.name() == "Gent")
        .unwrap();
    assert_eq!(gent_row.1.len(), 2);
}

#[test]
fn payload_deserializes_from_transport_json() {
    init_logging();
    let roster = Roster::new(&["A", "B", "C"]);
    let mut contest = Contest::new(roster, PointScale::new(vec![2, 0]));

    let payload: VotePayload =
        serde_json::from_str(r#"{"school": "a", "distribution": {"B": 2, "C": 0}}"#).unwrap();
    let response = VoteResponse::from(contest.submit_vote(&payload));
    assert!(response.accepted);

    let payload: VotePayload =
        serde_json::from_str(r#"{"school": "a", "distribution": {"A": 2, "C": 0}}"#).unwrap();
    let response = VoteResponse::from(contest.submit_vote(&payload));
    assert!(!response.accepted);
    assert_eq!(response.reason.as_deref(), Some("self_vote"));
}
