// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::global_settings::{GlobalSettings, GLOBAL_SETTINGS_CACHE_KEY};
use crate::domain::repositories::global_settings_repository::{
    GlobalSettingsRepository, RepositoryError, StoreError,
};
use crate::domain::repositories::query_context::QueryContext;
use crate::domain::repositories::settings_cache::SettingsCache;
use crate::infrastructure::database::entities::global_settings as settings_entity;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use metrics::counter;
use sea_orm::sea_query::{Expr, OnConflict, Query, SimpleExpr};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend, DbErr,
    EntityTrait, QueryOrder,
};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 默认设置插入结果
///
/// `ON CONFLICT DO NOTHING` 在冲突时不返回任何行，据此区分两种成功结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultInsert {
    /// 新插入，携带数据库生成的时间戳
    Inserted {
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    },
    /// 相同标识符的记录已存在
    AlreadyExists,
}

/// 全局设置仓库实现
///
/// `with_tx` 与 `with_context` 返回新的实例，共享连接池与缓存句柄，
/// 原实例保持不变。
#[derive(Clone)]
pub struct GlobalSettingsRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
    /// 调用方提供的事务，存在时所有语句都在其中执行
    tx: Option<Arc<DatabaseTransaction>>,
    /// 截止时间与取消信号
    ctx: QueryContext,
    /// 可选缓存，更新后删除设置键
    cache: Option<Arc<dyn SettingsCache>>,
}

impl GlobalSettingsRepositoryImpl {
    /// 创建新的全局设置仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    /// * `cache` - 可选缓存客户端
    ///
    /// # 返回值
    ///
    /// 返回绑定到连接池、使用后台上下文的仓库实例
    pub fn new(db: Arc<DatabaseConnection>, cache: Option<Arc<dyn SettingsCache>>) -> Self {
        Self {
            db,
            tx: None,
            ctx: QueryContext::background(),
            cache,
        }
    }

    /// 返回在指定事务中执行全部语句的新实例
    pub fn with_tx(&self, tx: Arc<DatabaseTransaction>) -> Self {
        Self {
            tx: Some(tx),
            ..self.clone()
        }
    }

    /// 返回使用指定上下文的新实例
    pub fn with_context(&self, ctx: QueryContext) -> Self {
        Self {
            ctx,
            ..self.clone()
        }
    }

    pub fn context(&self) -> &QueryContext {
        &self.ctx
    }

    pub fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    fn backend(&self) -> DbBackend {
        match &self.tx {
            Some(tx) => tx.get_database_backend(),
            None => self.db.get_database_backend(),
        }
    }

    async fn fetch_current(&self) -> Result<Option<GlobalSettings>, StoreError> {
        match &self.tx {
            Some(tx) => self.ctx.run(select_latest(tx.as_ref())).await,
            None => self.ctx.run(select_latest(self.db.as_ref())).await,
        }
    }

    async fn update_row(
        &self,
        id: &str,
        settings: &GlobalSettings,
    ) -> Result<Option<DateTime<Utc>>, StoreError> {
        let backend = self.backend();
        match &self.tx {
            Some(tx) => {
                self.ctx
                    .run(update_policy_fields(tx.as_ref(), backend, id, settings))
                    .await
            }
            None => {
                self.ctx
                    .run(update_policy_fields(self.db.as_ref(), backend, id, settings))
                    .await
            }
        }
    }

    async fn insert_row(&self, defaults: &GlobalSettings) -> Result<DefaultInsert, StoreError> {
        let backend = self.backend();
        match &self.tx {
            Some(tx) => {
                self.ctx
                    .run(insert_if_absent(tx.as_ref(), backend, defaults))
                    .await
            }
            None => {
                self.ctx
                    .run(insert_if_absent(self.db.as_ref(), backend, defaults))
                    .await
            }
        }
    }

    async fn invalidate_cache(&self) {
        let Some(cache) = &self.cache else {
            return;
        };

        if let Err(e) = cache.delete(GLOBAL_SETTINGS_CACHE_KEY).await {
            counter!("global_settings_cache_invalidation_failures_total").increment(1);
            warn!("Failed to invalidate global settings cache: {}", e);
        }
    }
}

#[async_trait]
impl GlobalSettingsRepository for GlobalSettingsRepositoryImpl {
    async fn get_global_settings(&self) -> Result<GlobalSettings, RepositoryError> {
        counter!("global_settings_reads_total").increment(1);

        match self.fetch_current().await {
            Ok(Some(settings)) => Ok(settings),
            Ok(None) => self.create_default_global_settings().await,
            Err(e) => {
                error!("Failed to get global settings: {}", e);
                Err(RepositoryError::Fetch(e))
            }
        }
    }

    async fn update_global_settings(
        &self,
        mut settings: GlobalSettings,
    ) -> Result<GlobalSettings, RepositoryError> {
        let current = self
            .get_global_settings()
            .await
            .map_err(|e| RepositoryError::FetchCurrent(Box::new(e)))?;

        let updated_at = match self.update_row(&current.id, &settings).await {
            Ok(Some(updated_at)) => updated_at,
            Ok(None) => {
                error!(
                    "Global settings row {} disappeared before update",
                    current.id
                );
                return Err(RepositoryError::Update(StoreError::Database(
                    DbErr::RecordNotUpdated,
                )));
            }
            Err(e) => {
                error!("Failed to update global settings: {}", e);
                return Err(RepositoryError::Update(e));
            }
        };

        settings.id = current.id;
        settings.created_at = current.created_at;
        settings.updated_at = updated_at;

        counter!("global_settings_updates_total").increment(1);
        self.invalidate_cache().await;

        Ok(settings)
    }

    async fn create_default_global_settings(&self) -> Result<GlobalSettings, RepositoryError> {
        let mut settings = GlobalSettings::default();

        match self.insert_row(&settings).await {
            Ok(DefaultInsert::Inserted {
                created_at,
                updated_at,
            }) => {
                counter!("global_settings_defaults_created_total").increment(1);
                info!("Created default global settings ({})", settings.id);
                settings.created_at = created_at;
                settings.updated_at = updated_at;
                Ok(settings)
            }
            Ok(DefaultInsert::AlreadyExists) => {
                existing_after_conflict(self.fetch_current().await)
            }
            Err(e) => {
                error!("Failed to create default global settings: {}", e);
                Err(RepositoryError::CreateDefault(e))
            }
        }
    }
}

/// 插入冲突后读取到的现有记录
///
/// 任何失败都归到创建默认设置这一操作上。
pub(crate) fn existing_after_conflict(
    fetched: Result<Option<GlobalSettings>, StoreError>,
) -> Result<GlobalSettings, RepositoryError> {
    match fetched {
        Ok(Some(existing)) => Ok(existing),
        Ok(None) => {
            error!("Default global settings conflicted but no row is visible");
            Err(RepositoryError::CreateDefault(StoreError::Database(
                DbErr::RecordNotFound(
                    "default global settings conflicted but no row is visible".to_string(),
                ),
            )))
        }
        Err(e) => {
            error!("Failed to load existing global settings after conflict: {}", e);
            Err(RepositoryError::CreateDefault(e))
        }
    }
}

/// 数据库端的当前时间
///
/// SQLite 的 `CURRENT_TIMESTAMP` 只精确到秒，这里使用毫秒精度的格式。
fn server_now(backend: DbBackend) -> SimpleExpr {
    match backend {
        DbBackend::Sqlite => Expr::cust("strftime('%Y-%m-%d %H:%M:%f', 'now')"),
        _ => Expr::cust("NOW()"),
    }
}

async fn select_latest<C: ConnectionTrait>(conn: &C) -> Result<Option<GlobalSettings>, DbErr> {
    let model = settings_entity::Entity::find()
        .order_by_desc(settings_entity::Column::CreatedAt)
        .one(conn)
        .await?;

    Ok(model.map(Into::into))
}

async fn update_policy_fields<C: ConnectionTrait>(
    conn: &C,
    backend: DbBackend,
    id: &str,
    settings: &GlobalSettings,
) -> Result<Option<DateTime<Utc>>, DbErr> {
    use settings_entity::Column;

    let stmt = Query::update()
        .table(settings_entity::Entity)
        .values([
            (Column::MaintenanceMode, settings.maintenance_mode.into()),
            (
                Column::MaintenanceMessage,
                settings.maintenance_message.clone().into(),
            ),
            (
                Column::MaxUsersPerOrganization,
                settings.max_users_per_organization.into(),
            ),
            (
                Column::MaxSessionDuration,
                settings.max_session_duration.into(),
            ),
            (Column::PasswordMinLength, settings.password_min_length.into()),
            (Column::RequireMfa, settings.require_mfa.into()),
            (Column::AllowRegistration, settings.allow_registration.into()),
            (
                Column::EmailVerificationRequired,
                settings.email_verification_required.into(),
            ),
            (
                Column::TokenExpirationMinutes,
                settings.token_expiration_minutes.into(),
            ),
            (
                Column::AuditLogRetentionDays,
                settings.audit_log_retention_days.into(),
            ),
            (Column::Settings, settings.settings.clone().into()),
            (Column::UpdatedAt, server_now(backend)),
        ])
        .and_where(Column::Id.eq(id))
        .returning_col(Column::UpdatedAt)
        .to_owned();

    match conn.query_one(backend.build(&stmt)).await? {
        Some(row) => Ok(Some(row.try_get::<DateTime<Utc>>("", "updated_at")?)),
        None => Ok(None),
    }
}

async fn insert_if_absent<C: ConnectionTrait>(
    conn: &C,
    backend: DbBackend,
    defaults: &GlobalSettings,
) -> Result<DefaultInsert, DbErr> {
    use settings_entity::Column;

    let mut stmt = Query::insert();
    stmt.into_table(settings_entity::Entity).columns([
        Column::Id,
        Column::MaintenanceMode,
        Column::MaintenanceMessage,
        Column::MaxUsersPerOrganization,
        Column::MaxSessionDuration,
        Column::PasswordMinLength,
        Column::RequireMfa,
        Column::AllowRegistration,
        Column::EmailVerificationRequired,
        Column::TokenExpirationMinutes,
        Column::AuditLogRetentionDays,
        Column::Settings,
        Column::CreatedAt,
        Column::UpdatedAt,
    ]);
    stmt.values([
        defaults.id.clone().into(),
        defaults.maintenance_mode.into(),
        defaults.maintenance_message.clone().into(),
        defaults.max_users_per_organization.into(),
        defaults.max_session_duration.into(),
        defaults.password_min_length.into(),
        defaults.require_mfa.into(),
        defaults.allow_registration.into(),
        defaults.email_verification_required.into(),
        defaults.token_expiration_minutes.into(),
        defaults.audit_log_retention_days.into(),
        defaults.settings.clone().into(),
        server_now(backend),
        server_now(backend),
    ])
    .map_err(|e| DbErr::Custom(e.to_string()))?;
    stmt.on_conflict(OnConflict::column(Column::Id).do_nothing().to_owned())
        .returning(Query::returning().columns([Column::CreatedAt, Column::UpdatedAt]));

    match conn.query_one(backend.build(&stmt)).await? {
        Some(row) => Ok(DefaultInsert::Inserted {
            created_at: row.try_get("", "created_at")?,
            updated_at: row.try_get("", "updated_at")?,
        }),
        None => Ok(DefaultInsert::AlreadyExists),
    }
}
