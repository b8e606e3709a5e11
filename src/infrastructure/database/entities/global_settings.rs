// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::global_settings::GlobalSettings;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "global_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub maintenance_mode: bool,
    pub maintenance_message: String,
    pub max_users_per_organization: i32,
    pub max_session_duration: i32,
    pub password_min_length: i32,
    pub require_mfa: bool,
    pub allow_registration: bool,
    pub email_verification_required: bool,
    pub token_expiration_minutes: i32,
    pub audit_log_retention_days: i32,
    pub settings: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GlobalSettings {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            maintenance_mode: m.maintenance_mode,
            maintenance_message: m.maintenance_message,
            max_users_per_organization: m.max_users_per_organization,
            max_session_duration: m.max_session_duration,
            password_min_length: m.password_min_length,
            require_mfa: m.require_mfa,
            allow_registration: m.allow_registration,
            email_verification_required: m.email_verification_required,
            token_expiration_minutes: m.token_expiration_minutes,
            audit_log_retention_days: m.audit_log_retention_days,
            settings: m.settings,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
