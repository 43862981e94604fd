//! Integration tests for the user, challenge and participant repositories.
//!
//! Exercises the repository layer against a real database:
//! - Defaults applied on insert
//! - Unique constraint violations
//! - Visibility rules for private challenges
//! - Cascade behaviour on delete

use chrono::{TimeZone, Utc};
use grit_core::challenge::derive_end_date;
use grit_core::types::Timestamp;
use grit_db::models::challenge::{Challenge, CreateChallenge, CreateChallengeRules, UpdateChallenge};
use grit_db::models::user::{CreateUser, UpdateUser, User};
use grit_db::repositories::{ChallengeRepo, CheckInRepo, ParticipantRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn create_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "argon2-hash".to_string(),
            is_admin: false,
        },
    )
    .await
    .unwrap()
}

fn new_challenge(title: &str, start: Timestamp) -> CreateChallenge {
    CreateChallenge {
        title: title.to_string(),
        description: None,
        modality: "running".to_string(),
        target: 20,
        duration_days: 30,
        start_date: start,
        bet: None,
        is_private: None,
        rules: None,
    }
}

async fn create_challenge(pool: &PgPool, created_by: i64, title: &str, code: &str) -> Challenge {
    let start = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    let data = new_challenge(title, start);
    let end = derive_end_date(data.start_date, data.duration_days);

    let mut tx = pool.begin().await.unwrap();
    let challenge = ChallengeRepo::create(&mut tx, created_by, &data, code, end)
        .await
        .unwrap();
    ParticipantRepo::create(&mut tx, challenge.id, created_by, true)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    challenge
}

// ---------------------------------------------------------------------------
// Test: User defaults and constraints
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_user_applies_defaults(pool: PgPool) {
    let user = create_user(&pool, "ana").await;
    assert_eq!(user.username, "ana");
    assert_eq!(user.status, "normal");
    assert_eq!(user.points, 0);
    assert_eq!(user.weeks_won, 0);
    assert!(!user.is_admin);
    assert!(user.profile_image.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_rejected(pool: PgPool) {
    create_user(&pool, "ana").await;
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            username: "ana".to_string(),
            password_hash: "other-hash".to_string(),
            is_admin: false,
        },
    )
    .await;
    assert!(result.is_err(), "Duplicate username should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_username(pool: PgPool) {
    let created = create_user(&pool, "bruno").await;
    let found = UserRepo::find_by_username(&pool, "bruno")
        .await
        .unwrap()
        .expect("bruno should exist");
    assert_eq!(found.id, created.id);

    assert!(UserRepo::find_by_username(&pool, "ghost")
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_profile_partial(pool: PgPool) {
    let user = create_user(&pool, "carla").await;

    let updated = UserRepo::update_profile(
        &pool,
        user.id,
        &UpdateUser {
            username: None,
            profile_image: Some("/img/carla.png".to_string()),
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");

    assert_eq!(updated.username, "carla");
    assert_eq!(updated.profile_image.as_deref(), Some("/img/carla.png"));

    let missing = UserRepo::update_profile(
        &pool,
        999_999,
        &UpdateUser {
            username: Some("ghost".to_string()),
            profile_image: None,
        },
    )
    .await
    .unwrap();
    assert!(missing.is_none(), "Updating non-existent ID should return None");
}

// ---------------------------------------------------------------------------
// Test: Challenge creation, rules and lookup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_create_derives_end_date(pool: PgPool) {
    let creator = create_user(&pool, "dora").await;
    let challenge = create_challenge(&pool, creator.id, "March Miles", "MARCH001").await;

    assert_eq!(challenge.code, "MARCH001");
    assert!(challenge.is_private, "is_private should default to TRUE");
    assert_eq!(
        challenge.end_date,
        challenge.start_date + chrono::Duration::days(30)
    );

    let by_code = ChallengeRepo::find_by_code(&pool, "MARCH001")
        .await
        .unwrap()
        .expect("code lookup should hit");
    assert_eq!(by_code.id, challenge.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_rules_defaults(pool: PgPool) {
    let creator = create_user(&pool, "eli").await;
    let challenge = create_challenge(&pool, creator.id, "Ruled", "RULED001").await;

    let mut tx = pool.begin().await.unwrap();
    let rules = ChallengeRepo::create_rules(
        &mut tx,
        challenge.id,
        &CreateChallengeRules {
            min_threshold: 3,
            min_points: 10,
            additional_unit: 1,
            additional_points: 3,
            unit_name: None,
            period: None,
        },
    )
    .await
    .unwrap();
    tx.commit().await.unwrap();

    assert_eq!(rules.unit_name, "workouts");
    assert_eq!(rules.period, "weekly");

    let found = ChallengeRepo::find_rules(&pool, challenge.id)
        .await
        .unwrap()
        .expect("rules should exist");
    assert_eq!(found.id, rules.id);

    assert!(ChallengeRepo::find_rules(&pool, 999_999)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_invite_code_rejected(pool: PgPool) {
    let creator = create_user(&pool, "fabi").await;
    create_challenge(&pool, creator.id, "First", "SAMECODE").await;

    let start = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    let data = new_challenge("Second", start);
    let end = derive_end_date(start, data.duration_days);
    let mut tx = pool.begin().await.unwrap();
    let result = ChallengeRepo::create(&mut tx, creator.id, &data, "SAMECODE", end).await;
    assert!(result.is_err(), "Duplicate invite code should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_challenge_update_recomputes_end_date(pool: PgPool) {
    let creator = create_user(&pool, "gil").await;
    let challenge = create_challenge(&pool, creator.id, "Flexible", "FLEX0001").await;

    let mut tx = pool.begin().await.unwrap();
    let updated = ChallengeRepo::update(
        &mut tx,
        challenge.id,
        &UpdateChallenge {
            title: Some("Flexible v2".to_string()),
            description: None,
            modality: None,
            target: None,
            duration_days: Some(10),
            start_date: None,
            bet: None,
            is_private: Some(false),
        },
    )
    .await
    .unwrap()
    .expect("Update should return the row");
    tx.commit().await.unwrap();

    assert_eq!(updated.title, "Flexible v2");
    assert!(!updated.is_private);
    assert_eq!(updated.modality, "running", "Unset fields keep old values");
    assert_eq!(
        updated.end_date,
        updated.start_date + chrono::Duration::days(10),
        "end_date should follow the new duration"
    );
}

// ---------------------------------------------------------------------------
// Test: Membership constraints and approval
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_membership_rejected(pool: PgPool) {
    let creator = create_user(&pool, "hugo").await;
    let member = create_user(&pool, "iris").await;
    let challenge = create_challenge(&pool, creator.id, "Members", "MEMBER01").await;

    let mut tx = pool.begin().await.unwrap();
    ParticipantRepo::create(&mut tx, challenge.id, member.id, false)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let result = ParticipantRepo::create(&mut tx, challenge.id, member.id, false).await;
    assert!(result.is_err(), "Duplicate (challenge, user) should fail");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_approve_member(pool: PgPool) {
    let creator = create_user(&pool, "jose").await;
    let member = create_user(&pool, "kaya").await;
    let challenge = create_challenge(&pool, creator.id, "Approvals", "APPROVE1").await;

    let mut tx = pool.begin().await.unwrap();
    let pending = ParticipantRepo::create(&mut tx, challenge.id, member.id, false)
        .await
        .unwrap();
    tx.commit().await.unwrap();
    assert!(!pending.approved);

    let mut tx = pool.begin().await.unwrap();
    let approved = ParticipantRepo::approve(&mut tx, challenge.id, member.id)
        .await
        .unwrap()
        .expect("membership should exist");
    tx.commit().await.unwrap();
    assert!(approved.approved);

    let mut tx = pool.begin().await.unwrap();
    let missing = ParticipantRepo::approve(&mut tx, challenge.id, 999_999)
        .await
        .unwrap();
    assert!(missing.is_none(), "Approving a non-member should return None");
}

// ---------------------------------------------------------------------------
// Test: Visibility of private challenges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_private_challenges_hidden_from_strangers(pool: PgPool) {
    let creator = create_user(&pool, "nina").await;
    let member = create_user(&pool, "otto").await;
    let stranger = create_user(&pool, "pola").await;

    // Private by default.
    let private = create_challenge(&pool, creator.id, "Private", "PRIVATE1").await;

    let start = Utc.with_ymd_and_hms(2025, 3, 2, 0, 0, 0).unwrap();
    let mut data = new_challenge("Public", start);
    data.is_private = Some(false);
    let end = derive_end_date(start, data.duration_days);
    let mut tx = pool.begin().await.unwrap();
    let public = ChallengeRepo::create(&mut tx, creator.id, &data, "PUBLIC01", end)
        .await
        .unwrap();
    ParticipantRepo::create(&mut tx, private.id, member.id, true)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let creator_sees = ChallengeRepo::list_visible(&pool, creator.id).await.unwrap();
    assert_eq!(creator_sees.len(), 2, "Creator sees own private and public");

    let member_sees = ChallengeRepo::list_visible(&pool, member.id).await.unwrap();
    assert_eq!(member_sees.len(), 2, "Member sees joined private and public");

    let stranger_sees = ChallengeRepo::list_visible(&pool, stranger.id).await.unwrap();
    assert_eq!(stranger_sees.len(), 1, "Stranger only sees public");
    assert_eq!(stranger_sees[0].id, public.id);
}

// ---------------------------------------------------------------------------
// Test: Participations listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_participations_pairs_challenges(pool: PgPool) {
    let creator = create_user(&pool, "rui").await;
    let other = create_user(&pool, "sara").await;
    let c1 = create_challenge(&pool, creator.id, "One", "PAIRS001").await;
    create_challenge(&pool, other.id, "Two", "PAIRS002").await;

    let participations = ParticipantRepo::list_participations(&pool, creator.id)
        .await
        .unwrap();
    assert_eq!(participations.len(), 1);
    assert_eq!(participations[0].challenge.id, c1.id);
    assert_eq!(participations[0].participant.user_id, creator.id);
    assert!(participations[0].participant.approved);
}

// ---------------------------------------------------------------------------
// Test: Cascade behaviour
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_challenge_cascades(pool: PgPool) {
    let creator = create_user(&pool, "tess").await;
    let challenge = create_challenge(&pool, creator.id, "Doomed", "DOOMED01").await;

    let inside = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
    let mut tx = pool.begin().await.unwrap();
    let tagged = CheckInRepo::create(&mut tx, creator.id, Some(challenge.id), inside, None, None)
        .await
        .unwrap();
    let general = CheckInRepo::create(&mut tx, creator.id, None, inside, None, None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    assert!(ChallengeRepo::delete(&mut tx, challenge.id).await.unwrap());
    tx.commit().await.unwrap();

    assert!(ParticipantRepo::find(&pool, challenge.id, creator.id)
        .await
        .unwrap()
        .is_none());
    assert!(
        CheckInRepo::find_by_id(&pool, tagged.id).await.unwrap().is_none(),
        "Challenge check-ins go with the challenge"
    );
    assert!(
        CheckInRepo::find_by_id(&pool, general.id).await.unwrap().is_some(),
        "General check-ins survive"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_user_cascades(pool: PgPool) {
    let creator = create_user(&pool, "uma").await;
    let challenge = create_challenge(&pool, creator.id, "Orphans", "ORPHAN01").await;

    let inside = Utc.with_ymd_and_hms(2025, 3, 3, 10, 0, 0).unwrap();
    let mut tx = pool.begin().await.unwrap();
    let checkin = CheckInRepo::create(&mut tx, creator.id, None, inside, None, None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(creator.id)
        .execute(&pool)
        .await
        .unwrap();

    assert!(CheckInRepo::find_by_id(&pool, checkin.id)
        .await
        .unwrap()
        .is_none());
    assert!(ParticipantRepo::find(&pool, challenge.id, creator.id)
        .await
        .unwrap()
        .is_none());
}
