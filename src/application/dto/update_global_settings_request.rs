// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::global_settings::GlobalSettings;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 更新全局设置请求DTO
///
/// 携带全部策略字段；标识符与时间戳由仓库决定，不在请求中出现。
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct UpdateGlobalSettingsRequest {
    /// 是否开启维护模式
    pub maintenance_mode: bool,

    /// 维护提示消息
    #[serde(default)]
    #[validate(length(max = 1024))]
    pub maintenance_message: String,

    /// 每个组织最大用户数
    #[validate(range(min = 1))]
    pub max_users_per_organization: i32,

    /// 会话最长持续时间（分钟，最多 30 天）
    #[validate(range(min = 1, max = 43200))]
    pub max_session_duration: i32,

    /// 密码最小长度
    #[validate(range(min = 6, max = 128))]
    pub password_min_length: i32,

    pub require_mfa: bool,

    pub allow_registration: bool,

    pub email_verification_required: bool,

    /// 令牌有效期（分钟，最多 30 天）
    #[validate(range(min = 1, max = 43200))]
    pub token_expiration_minutes: i32,

    /// 审计日志保留天数（最多 10 年）
    #[validate(range(min = 1, max = 3650))]
    pub audit_log_retention_days: i32,

    /// 扩展配置，缺省为 `"{}"`
    pub settings: Option<String>,
}

impl From<UpdateGlobalSettingsRequest> for GlobalSettings {
    fn from(req: UpdateGlobalSettingsRequest) -> Self {
        Self {
            id: String::new(),
            maintenance_mode: req.maintenance_mode,
            maintenance_message: req.maintenance_message,
            max_users_per_organization: req.max_users_per_organization,
            max_session_duration: req.max_session_duration,
            password_min_length: req.password_min_length,
            require_mfa: req.require_mfa,
            allow_registration: req.allow_registration,
            email_verification_required: req.email_verification_required,
            token_expiration_minutes: req.token_expiration_minutes,
            audit_log_retention_days: req.audit_log_retention_days,
            settings: req.settings.unwrap_or_else(|| "{}".to_string()),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}

impl From<&GlobalSettings> for UpdateGlobalSettingsRequest {
    fn from(settings: &GlobalSettings) -> Self {
        Self {
            maintenance_mode: settings.maintenance_mode,
            maintenance_message: settings.maintenance_message.clone(),
            max_users_per_organization: settings.max_users_per_organization,
            max_session_duration: settings.max_session_duration,
            password_min_length: settings.password_min_length,
            require_mfa: settings.require_mfa,
            allow_registration: settings.allow_registration,
            email_verification_required: settings.email_verification_required,
            token_expiration_minutes: settings.token_expiration_minutes,
            audit_log_retention_days: settings.audit_log_retention_days,
            settings: Some(settings.settings.clone()),
        }
    }
}
