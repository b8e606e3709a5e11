// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::domain::models::global_settings::{GlobalSettings, GLOBAL_SETTINGS_CACHE_KEY};
    use crate::domain::repositories::global_settings_repository::{
        GlobalSettingsRepository, RepositoryError, StoreError,
    };
    use crate::domain::repositories::query_context::QueryContext;
    use crate::domain::repositories::settings_cache::SettingsCache;
    use crate::infrastructure::cache::memory_cache::MemoryCache;
    use crate::infrastructure::database::entities::global_settings as settings_entity;
    use crate::infrastructure::repositories::global_settings_repo_impl::{
        existing_after_conflict, GlobalSettingsRepositoryImpl,
    };
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, TransactionTrait};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    async fn setup_db() -> Arc<DatabaseConnection> {
        let mut opt = ConnectOptions::new("sqlite::memory:".to_string());
        opt.max_connections(1)
            .min_connections(1)
            .sqlx_logging(false);

        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Arc::new(db)
    }

    async fn row_count(db: &DatabaseConnection) -> u64 {
        settings_entity::Entity::find().count(db).await.unwrap()
    }

    struct FailingCache {
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl SettingsCache for FailingCache {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow!("cache unavailable"))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<()> {
            Err(anyhow!("cache unavailable"))
        }

        async fn delete(&self, _key: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Err(anyhow!("cache unavailable"))
        }
    }

    fn maintenance_update() -> GlobalSettings {
        GlobalSettings {
            id: "caller-supplied".to_string(),
            maintenance_mode: true,
            maintenance_message: "down for maintenance".to_string(),
            created_at: Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap(),
            ..GlobalSettings::default()
        }
    }

    #[tokio::test]
    async fn test_get_on_empty_store_creates_defaults() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let first = repo.get_global_settings().await.unwrap();

        assert_eq!(first.id, "default");
        assert!(!first.maintenance_mode);
        assert_eq!(first.maintenance_message, "");
        assert_eq!(first.max_users_per_organization, 1000);
        assert_eq!(first.max_session_duration, 480);
        assert_eq!(first.password_min_length, 8);
        assert!(!first.require_mfa);
        assert!(first.allow_registration);
        assert!(first.email_verification_required);
        assert_eq!(first.token_expiration_minutes, 60);
        assert_eq!(first.audit_log_retention_days, 90);
        assert_eq!(first.settings, "{}");
        assert!(first.created_at > Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap());

        let second = repo.get_global_settings().await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_create_default_is_idempotent() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let first = repo.create_default_global_settings().await.unwrap();
        let second = repo.create_default_global_settings().await.unwrap();

        assert_eq!(first, second);
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_create_default_returns_existing_row_after_update() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        repo.get_global_settings().await.unwrap();
        repo.update_global_settings(maintenance_update()).await.unwrap();

        let existing = repo.create_default_global_settings().await.unwrap();
        assert!(existing.maintenance_mode);
        assert_eq!(existing.maintenance_message, "down for maintenance");
    }

    #[tokio::test]
    async fn test_update_preserves_identity_and_creation_time() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let before = repo.get_global_settings().await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let updated = repo.update_global_settings(maintenance_update()).await.unwrap();

        assert_eq!(updated.id, "default");
        assert_eq!(updated.created_at, before.created_at);
        assert!(updated.updated_at > before.updated_at);
        assert!(updated.maintenance_mode);
        assert_eq!(updated.maintenance_message, "down for maintenance");

        let reloaded = repo.get_global_settings().await.unwrap();
        assert_eq!(reloaded, updated);
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_update_timestamp_strictly_increases() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db, None);

        let mut previous = repo.get_global_settings().await.unwrap().updated_at;
        for max_users in [10, 20, 30] {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let settings = GlobalSettings {
                max_users_per_organization: max_users,
                ..GlobalSettings::default()
            };

            let updated = repo.update_global_settings(settings).await.unwrap();
            assert!(updated.updated_at > previous);
            assert_eq!(updated.max_users_per_organization, max_users);
            previous = updated.updated_at;
        }
    }

    #[tokio::test]
    async fn test_update_on_empty_store_creates_then_updates() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let updated = repo.update_global_settings(maintenance_update()).await.unwrap();

        assert_eq!(updated.id, "default");
        assert!(updated.maintenance_mode);
        assert_eq!(row_count(&db).await, 1);
    }

    #[tokio::test]
    async fn test_update_invalidates_cache_once() {
        let db = setup_db().await;
        let cache = Arc::new(MemoryCache::new());
        cache
            .set(GLOBAL_SETTINGS_CACHE_KEY, "{}", Duration::from_secs(60))
            .await
            .unwrap();
        let repo = GlobalSettingsRepositoryImpl::new(db, Some(cache.clone()));

        repo.get_global_settings().await.unwrap();
        assert_eq!(cache.stats().deletes, 0);

        repo.update_global_settings(maintenance_update()).await.unwrap();

        assert_eq!(cache.stats().deletes, 1);
        assert!(!cache.contains_key(GLOBAL_SETTINGS_CACHE_KEY));
    }

    #[tokio::test]
    async fn test_cache_failure_does_not_fail_update() {
        let db = setup_db().await;
        let cache = Arc::new(FailingCache {
            deletes: AtomicUsize::new(0),
        });
        let repo = GlobalSettingsRepositoryImpl::new(db, Some(cache.clone()));

        let updated = repo.update_global_settings(maintenance_update()).await;

        assert!(updated.is_ok());
        assert_eq!(cache.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transaction_binding_routes_statements_to_transaction() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let tx = Arc::new(db.begin().await.unwrap());
        let tx_repo = repo.with_tx(tx.clone());
        assert!(tx_repo.in_transaction());
        assert!(!repo.in_transaction());

        let inside = tx_repo.get_global_settings().await.unwrap();
        assert_eq!(inside.id, "default");
        drop(tx_repo);

        // Rolling back must discard the default row created inside the transaction
        match Arc::try_unwrap(tx) {
            Ok(tx) => tx.rollback().await.unwrap(),
            Err(_) => panic!("transaction still shared"),
        }
        assert_eq!(row_count(&db).await, 0);
    }

    #[tokio::test]
    async fn test_transaction_commit_persists_update() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let tx = Arc::new(db.begin().await.unwrap());
        repo.with_tx(tx.clone())
            .update_global_settings(maintenance_update())
            .await
            .unwrap();

        match Arc::try_unwrap(tx) {
            Ok(tx) => tx.commit().await.unwrap(),
            Err(_) => panic!("transaction still shared"),
        }

        let committed = repo.get_global_settings().await.unwrap();
        assert!(committed.maintenance_mode);
    }

    #[tokio::test]
    async fn test_cancelled_context_surfaces_fetch_error() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db.clone(), None);

        let token = CancellationToken::new();
        token.cancel();
        let cancelled = repo.with_context(QueryContext::background().with_cancellation(token));

        let err = cancelled.get_global_settings().await.unwrap_err();
        assert!(matches!(err, RepositoryError::Fetch(StoreError::Cancelled)));

        // The unbound repository keeps its background context
        assert!(!repo.context().is_cancelled());
        assert!(repo.get_global_settings().await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_deadline_fails_update_with_context() {
        let db = setup_db().await;
        let repo = GlobalSettingsRepositoryImpl::new(db, None)
            .with_context(QueryContext::with_timeout(Duration::ZERO));

        let err = repo
            .update_global_settings(maintenance_update())
            .await
            .unwrap_err();

        match err {
            RepositoryError::FetchCurrent(inner) => {
                assert!(matches!(
                    *inner,
                    RepositoryError::Fetch(StoreError::DeadlineExceeded)
                ));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_maintenance_scenario() {
        let db = setup_db().await;
        let cache = Arc::new(MemoryCache::new());
        let repo = GlobalSettingsRepositoryImpl::new(db, Some(cache.clone()));

        let existing = repo.get_global_settings().await.unwrap();
        let request = GlobalSettings {
            maintenance_mode: true,
            maintenance_message: "down for maintenance".to_string(),
            ..existing.clone()
        };

        let updated = repo.update_global_settings(request).await.unwrap();

        assert_eq!(updated.id, "default");
        assert!(updated.maintenance_mode);
        assert_eq!(updated.maintenance_message, "down for maintenance");
        assert_eq!(updated.created_at, existing.created_at);
        assert!(updated.updated_at >= existing.updated_at);
        assert_eq!(updated.max_users_per_organization, 1000);
        assert_eq!(cache.stats().deletes, 1);
    }

    #[test]
    fn test_conflict_fallback_errors_are_create_default_errors() {
        let err = existing_after_conflict(Err(StoreError::Cancelled)).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::CreateDefault(StoreError::Cancelled)
        ));
        assert!(err
            .to_string()
            .starts_with("failed to create default global settings"));

        let err = existing_after_conflict(Ok(None)).unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::CreateDefault(StoreError::Database(sea_orm::DbErr::RecordNotFound(_)))
        ));

        let existing = GlobalSettings {
            maintenance_mode: true,
            ..GlobalSettings::default()
        };
        assert_eq!(
            existing_after_conflict(Ok(Some(existing.clone()))).unwrap(),
            existing
        );
    }
}
