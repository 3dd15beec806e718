mod common;

use std::collections::HashSet;

use common::{add_tenant, memory_pool, request, SEVEN};
use volley_lineup::database::participant_repo::{self, NewParticipant};
use volley_lineup::database::schema::DEFAULT_TENANT_ID;
use volley_lineup::models::{name_key, Gender};
use volley_lineup::services::admission_service::{
    AdmissionError, AdmissionLedger, AdmissionPolicy,
};
use volley_lineup::services::history_service;
use volley_lineup::services::team_draw_service::{self, CAPACITY, TEAM_COUNT, TEAM_SIZE};

const T: &str = DEFAULT_TENANT_ID;

async fn ledger(policy: AdmissionPolicy) -> AdmissionLedger {
    AdmissionLedger::new(memory_pool().await, policy)
}

async fn confirm_many(ledger: &AdmissionLedger, count: usize) {
    for i in 0..count {
        let gender = if i % 3 == 0 { "female" } else { "male" };
        ledger
            .confirm(T, &request(&format!("Player {i}"), "monthly", Some(gender)))
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn confirm_returns_position_and_waitlist_flag() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    confirm_many(&ledger, CAPACITY - 1).await;

    let last_seat = ledger
        .confirm(T, &request("Zeca", "casual", Some("male")))
        .await
        .unwrap();
    assert_eq!(last_seat.position, CAPACITY);
    assert!(!last_seat.is_waitlisted);

    let overflow = ledger
        .confirm(T, &request("Yara", "casual", Some("female")))
        .await
        .unwrap();
    assert_eq!(overflow.position, CAPACITY + 1);
    assert!(overflow.is_waitlisted);
    assert_eq!(overflow.participant.gender, Gender::Female);
}

#[tokio::test]
async fn list_splits_by_arrival_order() {
    for total in [0, 1, CAPACITY - 1, CAPACITY, CAPACITY + 5] {
        let ledger = ledger(AdmissionPolicy::Waitlist).await;
        confirm_many(&ledger, total).await;

        let roster = ledger.list(T).await.unwrap();
        assert_eq!(roster.confirmed.len(), total.min(CAPACITY));
        assert_eq!(roster.waitlist.len(), total.saturating_sub(CAPACITY));

        let names: Vec<String> = roster
            .confirmed
            .iter()
            .chain(roster.waitlist.iter())
            .map(|p| p.name.clone())
            .collect();
        let expected: Vec<String> = (0..total).map(|i| format!("Player {i}")).collect();
        assert_eq!(names, expected);

        if let (Some(last_confirmed), Some(first_waiting)) =
            (roster.confirmed.last(), roster.waitlist.first())
        {
            assert!(last_confirmed.confirmed_at <= first_waiting.confirmed_at);
        }
    }
}

#[tokio::test]
async fn duplicate_names_are_rejected_case_insensitively() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    ledger.confirm(T, &request("Ana", "monthly", None)).await.unwrap();

    for variant in ["ana", "ANA", " aNa "] {
        let err = ledger
            .confirm(T, &request(variant, "casual", Some("female")))
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::DuplicateName(_)), "{variant}: {err}");
    }

    ledger.confirm(T, &request("JOÃO", "monthly", Some("male"))).await.unwrap();
    for variant in ["joão", "João", " jOÃo "] {
        let err = ledger
            .confirm(T, &request(variant, "casual", Some("male")))
            .await
            .unwrap_err();
        assert!(matches!(err, AdmissionError::DuplicateName(_)), "{variant}: {err}");
    }
    // Different letters, not a case variant.
    ledger.confirm(T, &request("Joao", "casual", Some("male"))).await.unwrap();

    // Also when the first entry sits on the waitlist.
    confirm_many(&ledger, CAPACITY).await;
    let waiting = ledger
        .confirm(T, &request("Waiting Will", "casual", None))
        .await
        .unwrap();
    assert!(waiting.is_waitlisted);
    let err = ledger
        .confirm(T, &request("WAITING will", "casual", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::DuplicateName(_)));

    assert_eq!(ledger.list(T).await.unwrap().total(), CAPACITY + 4);
}

fn new_participant<'a>(id: &'a str, name: &'a str, key: &'a str) -> NewParticipant<'a> {
    NewParticipant {
        id,
        tenant_id: T,
        name,
        name_key: key,
        category: "casual",
        gender: None,
    }
}

#[tokio::test]
async fn name_index_rejects_accented_case_variants() {
    let pool = memory_pool().await;
    let mut conn = pool.acquire().await.unwrap();

    let upper = name_key("ÉDER");
    participant_repo::insert_participant(&mut conn, new_participant("a", "ÉDER", &upper))
        .await
        .unwrap();

    let lower = name_key("éder");
    let err = participant_repo::insert_participant(&mut conn, new_participant("b", "éder", &lower))
        .await
        .unwrap_err();
    let db = err.as_database_error().expect("database error");
    assert!(db.is_unique_violation(), "{err}");
}

#[tokio::test]
async fn ranking_groups_accented_names_together() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    for spelling in ["JOÃO", "João", "joão"] {
        ledger.confirm(T, &request(spelling, "monthly", Some("male"))).await.unwrap();
        ledger.confirm(T, &request("Éder", "casual", None)).await.unwrap();
        ledger.clear(T).await.unwrap();
    }
    ledger.confirm(T, &request("ÉDER", "casual", None)).await.unwrap();

    let ranking = history_service::attendance_ranking(ledger.pool(), T, None)
        .await
        .unwrap();
    assert_eq!(ranking.len(), 2);
    assert_eq!(ranking[0].confirmations, 4);
    assert_eq!(ranking[0].name.to_lowercase(), "éder");
    assert_eq!(ranking[1].confirmations, 3);
    assert_eq!(ranking[1].name.to_lowercase(), "joão");
}

#[tokio::test]
async fn invalid_submissions_leave_no_trace() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    for bad in [
        request("", "monthly", None),
        request("Ana", "", None),
        request("Ana", "weekly", None),
        request("Ana", "monthly", Some("robot")),
    ] {
        let err = ledger.confirm(T, &bad).await.unwrap_err();
        assert!(matches!(err, AdmissionError::Validation(_)));
    }
    assert_eq!(ledger.list(T).await.unwrap().total(), 0);
    let history = history_service::attendance_ranking(ledger.pool(), T, None)
        .await
        .unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn missing_gender_reads_as_male() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    let admission = ledger.confirm(T, &request("Beto", "avulso", None)).await.unwrap();
    assert_eq!(admission.participant.gender, Gender::Male);

    let stored: Option<String> =
        sqlx::query_scalar("SELECT gender FROM participants WHERE id = ?1")
            .bind(&admission.participant.id)
            .fetch_one(ledger.pool())
            .await
            .unwrap();
    assert_eq!(stored, None);
    assert_eq!(ledger.list(T).await.unwrap().confirmed[0].gender, Gender::Male);
}

#[tokio::test]
async fn remove_promotes_first_waitlisted() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    confirm_many(&ledger, CAPACITY + 2).await;

    let before = ledger.list(T).await.unwrap();
    let removed_id = before.confirmed[3].id.clone();
    ledger.remove(T, &removed_id).await.unwrap();

    let after = ledger.list(T).await.unwrap();
    assert_eq!(after.total(), before.total() - 1);
    assert!(after
        .confirmed
        .iter()
        .chain(after.waitlist.iter())
        .all(|p| p.id != removed_id));
    assert_eq!(after.confirmed.last().unwrap().name, before.waitlist[0].name);
    assert_eq!(after.waitlist.len(), 1);
    assert_eq!(after.waitlist[0].name, before.waitlist[1].name);
}

#[tokio::test]
async fn remove_unknown_id_is_not_found() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    confirm_many(&ledger, 2).await;
    let err = ledger.remove(T, "no-such-id").await.unwrap_err();
    assert!(matches!(err, AdmissionError::NotFound(_)));
    assert_eq!(ledger.list(T).await.unwrap().total(), 2);
}

#[tokio::test]
async fn clear_empties_session_but_keeps_history() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    confirm_many(&ledger, CAPACITY + 3).await;

    assert_eq!(ledger.clear(T).await.unwrap(), (CAPACITY + 3) as u64);
    let roster = ledger.list(T).await.unwrap();
    assert!(roster.confirmed.is_empty());
    assert!(roster.waitlist.is_empty());

    // Same names may confirm again in the next session.
    confirm_many(&ledger, 2).await;
    let ranking = history_service::attendance_ranking(ledger.pool(), T, Some(3))
        .await
        .unwrap();
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0].rank, 1);
    assert_eq!(ranking[0].confirmations, 2);
    assert_eq!(ranking[1].confirmations, 2);
    assert_eq!(ranking[2].confirmations, 1);
}

#[tokio::test]
async fn reject_policy_refuses_when_full() {
    let ledger = ledger(AdmissionPolicy::RejectWhenFull).await;
    confirm_many(&ledger, CAPACITY).await;

    let err = ledger
        .confirm(T, &request("Late Larry", "casual", None))
        .await
        .unwrap_err();
    assert!(matches!(err, AdmissionError::CapacityExceeded { capacity } if capacity == CAPACITY));

    let roster = ledger.list(T).await.unwrap();
    assert_eq!(roster.confirmed.len(), CAPACITY);
    assert!(roster.waitlist.is_empty());

    ledger.remove(T, &roster.confirmed[0].id).await.unwrap();
    ledger
        .confirm(T, &request("Late Larry", "casual", None))
        .await
        .unwrap();
}

#[tokio::test]
async fn tenants_do_not_share_sessions() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    add_tenant(ledger.pool(), "beach", "active", None).await;

    ledger.confirm(T, &request("Ana", "monthly", None)).await.unwrap();
    ledger.confirm("beach", &request("Ana", "monthly", None)).await.unwrap();
    ledger.confirm("beach", &request("Beto", "monthly", None)).await.unwrap();

    assert_eq!(ledger.list(T).await.unwrap().total(), 1);
    assert_eq!(ledger.list("beach").await.unwrap().total(), 2);

    let main_id = ledger.list(T).await.unwrap().confirmed[0].id.clone();
    let err = ledger.remove("beach", &main_id).await.unwrap_err();
    assert!(matches!(err, AdmissionError::NotFound(_)));

    ledger.clear("beach").await.unwrap();
    assert_eq!(ledger.list(T).await.unwrap().total(), 1);
}

#[tokio::test]
async fn concurrent_confirms_keep_names_unique() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;

    let mut handles = Vec::new();
    for i in 0..30 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .confirm(T, &request(&format!("Runner {i}"), "casual", None))
                .await
        }));
    }
    for variant in ["dup", "Dup", "DUP", "dUp", "duP"] {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger.confirm(T, &request(variant, "casual", None)).await
        }));
    }

    let mut ok = 0;
    let mut duplicates = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => ok += 1,
            Err(AdmissionError::DuplicateName(_)) => duplicates += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, 31);
    assert_eq!(duplicates, 4);

    let roster = ledger.list(T).await.unwrap();
    assert_eq!(roster.confirmed.len(), CAPACITY);
    assert_eq!(roster.waitlist.len(), 31 - CAPACITY);
}

#[tokio::test]
async fn concurrent_confirms_respect_capacity_under_reject() {
    let ledger = ledger(AdmissionPolicy::RejectWhenFull).await;

    let mut handles = Vec::new();
    for i in 0..40 {
        let ledger = ledger.clone();
        handles.push(tokio::spawn(async move {
            ledger
                .confirm(T, &request(&format!("Rusher {i}"), "monthly", None))
                .await
        }));
    }

    let mut ok = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(admission) => {
                assert!(!admission.is_waitlisted);
                ok += 1;
            }
            Err(AdmissionError::CapacityExceeded { .. }) => full += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(ok, CAPACITY);
    assert_eq!(full, 40 - CAPACITY);
}

#[tokio::test]
async fn seven_player_friday_scenario() {
    let ledger = ledger(AdmissionPolicy::Waitlist).await;
    for (name, gender) in SEVEN {
        ledger
            .confirm(T, &request(name, "monthly", Some(gender)))
            .await
            .unwrap();
    }

    let roster = ledger.list(T).await.unwrap();
    assert_eq!(roster.confirmed.len(), 7);
    assert!(roster.waitlist.is_empty());

    let draw = team_draw_service::draw(&roster.confirmed);
    assert_eq!(draw.teams.len(), TEAM_COUNT);
    assert!(draw.teams.iter().all(|t| t.slots.len() == TEAM_SIZE));
    assert_eq!(draw.players().count(), 7);
    assert_eq!(draw.open_slots(), 17);
    assert!(draw.teams.iter().all(|t| t.players().count() <= 2));

    let drawn: HashSet<&str> = draw.players().map(|p| p.name.as_str()).collect();
    let expected: HashSet<&str> = SEVEN.iter().map(|(name, _)| *name).collect();
    assert_eq!(drawn, expected);

    // Drawing never touches the ledger.
    assert_eq!(ledger.list(T).await.unwrap().confirmed, roster.confirmed);
}
