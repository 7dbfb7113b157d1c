//! Repository behaviour against a real Postgres.

use baitong_core::accounts::AccountStatus;
use baitong_core::plant::PlantStatus;
use baitong_core::qr_token::QrTokenState;
use baitong_core::roles::Role;
use baitong_db::models::plant::{CreatePlant, UpdatePlant};
use baitong_db::models::qr_token::CreateQrToken;
use baitong_db::models::user::{CreateUser, UpdateUser};
use baitong_db::repositories::{PlantRepo, QrTokenRepo, RevokedTokenRepo, UserRepo};
use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;

fn new_user(identity: &str) -> CreateUser {
    CreateUser {
        identity: identity.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        role: Role::Ministry,
    }
}

fn new_plant(name: &str) -> CreatePlant {
    CreatePlant {
        farmer_image_url: None,
        farm_location: "Takeo".to_string(),
        plant_name: name.to_string(),
        planted_date: NaiveDate::from_ymd_opt(2026, 3, 1),
        harvest_date: None,
        sensor_device: Some("esp32-02".to_string()),
        status: PlantStatus::WellPlanted,
    }
}

/// Every unique constraint is named `uq_*` so the API can map violations to 409.
#[sqlx::test(migrations = "../../db/migrations")]
async fn unique_constraints_follow_naming_convention(pool: PgPool) {
    let names: Vec<(String,)> = sqlx::query_as(
        "SELECT constraint_name
         FROM information_schema.table_constraints
         WHERE constraint_type = 'UNIQUE' AND table_schema = 'public'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!names.is_empty());
    for (name,) in &names {
        assert!(name.starts_with("uq_"), "unique constraint {name} should start with uq_");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_identity_violates_uq_users_identity(pool: PgPool) {
    UserRepo::create(&pool, &new_user("sokha")).await.unwrap();
    let err = UserRepo::create(&pool, &new_user("sokha")).await.unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_identity"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn user_update_is_partial(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("dara")).await.unwrap();
    assert_eq!(user.status().unwrap(), AccountStatus::Active);

    let updated = UserRepo::update(
        &pool,
        user.id,
        &UpdateUser {
            status: Some(AccountStatus::Disabled),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.status().unwrap(), AccountStatus::Disabled);
    assert_eq!(updated.role().unwrap(), Role::Ministry);
    assert_eq!(updated.password_hash, user.password_hash);
    assert!(UserRepo::update(&pool, 9999, &UpdateUser::default())
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn revocation_is_idempotent_and_survives_user_delete(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("vanna")).await.unwrap();
    let exp = Utc::now() + Duration::hours(1);

    assert!(RevokedTokenRepo::revoke(&pool, "jti-1", Some(user.id), exp).await.unwrap());
    assert!(!RevokedTokenRepo::revoke(&pool, "jti-1", Some(user.id), exp).await.unwrap());

    assert!(UserRepo::delete(&pool, user.id).await.unwrap());
    assert!(RevokedTokenRepo::is_revoked(&pool, "jti-1").await.unwrap());
    assert!(!RevokedTokenRepo::is_revoked(&pool, "jti-2").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn purge_removes_only_expired_entries(pool: PgPool) {
    let now = Utc::now();
    RevokedTokenRepo::revoke(&pool, "old", None, now - Duration::minutes(5))
        .await
        .unwrap();
    RevokedTokenRepo::revoke(&pool, "fresh", None, now + Duration::minutes(5))
        .await
        .unwrap();

    assert_eq!(RevokedTokenRepo::purge_expired(&pool, now).await.unwrap(), 1);
    assert!(!RevokedTokenRepo::is_revoked(&pool, "old").await.unwrap());
    assert!(RevokedTokenRepo::is_revoked(&pool, "fresh").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plant_update_can_clear_nullable_columns(pool: PgPool) {
    let plant = PlantRepo::create(&pool, &new_plant("Mango")).await.unwrap();

    let updated = PlantRepo::update(
        &pool,
        plant.id,
        &UpdatePlant {
            planted_date: Some(None),
            plant_name: Some("Longan".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();

    assert_eq!(updated.plant_name, "Longan");
    assert_eq!(updated.planted_date, None);
    assert_eq!(updated.sensor_device.as_deref(), Some("esp32-02"));
    assert_eq!(updated.farm_location, "Takeo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn plants_list_newest_first(pool: PgPool) {
    PlantRepo::create(&pool, &new_plant("first")).await.unwrap();
    PlantRepo::create(&pool, &new_plant("second")).await.unwrap();

    let names: Vec<String> = PlantRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.plant_name)
        .collect();
    assert_eq!(names, ["second", "first"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn qr_revoke_keeps_first_timestamp_and_cascades(pool: PgPool) {
    let plant = PlantRepo::create(&pool, &new_plant("Durian")).await.unwrap();
    let token = QrTokenRepo::create(
        &pool,
        &CreateQrToken {
            plant_id: plant.id,
            token: "abc123".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        },
    )
    .await
    .unwrap();
    assert_eq!(token.state(Utc::now()), QrTokenState::Valid);

    let first = QrTokenRepo::revoke(&pool, token.id).await.unwrap().unwrap();
    let second = QrTokenRepo::revoke(&pool, token.id).await.unwrap().unwrap();
    assert!(first.revoked_at.is_some());
    assert_eq!(first.revoked_at, second.revoked_at);
    assert_eq!(second.state(Utc::now()), QrTokenState::Revoked);

    assert!(PlantRepo::delete(&pool, plant.id).await.unwrap());
    assert!(QrTokenRepo::find_by_token(&pool, "abc123").await.unwrap().is_none());
    assert!(QrTokenRepo::revoke(&pool, token.id).await.unwrap().is_none());
}
