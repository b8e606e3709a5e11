// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 全局设置的默认标识符
pub const DEFAULT_GLOBAL_SETTINGS_ID: &str = "default";

/// 全局设置在缓存中的键
pub const GLOBAL_SETTINGS_CACHE_KEY: &str = "global_settings";

/// 全局设置实体
///
/// 系统范围内唯一生效的配置记录，控制维护模式、注册策略、
/// 密码规则、令牌有效期以及审计日志保留期。
/// 仓库始终读取创建时间最新的一行。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// 记录标识符，通常为 `"default"`
    pub id: String,
    /// 是否处于维护模式
    pub maintenance_mode: bool,
    /// 维护模式下展示给用户的消息
    pub maintenance_message: String,
    /// 每个组织允许的最大用户数
    pub max_users_per_organization: i32,
    /// 会话最长持续时间（分钟）
    pub max_session_duration: i32,
    /// 密码最小长度
    pub password_min_length: i32,
    /// 是否强制启用多因素认证
    pub require_mfa: bool,
    /// 是否允许自助注册
    pub allow_registration: bool,
    /// 注册后是否要求邮箱验证
    pub email_verification_required: bool,
    /// 访问令牌有效期（分钟）
    pub token_expiration_minutes: i32,
    /// 审计日志保留天数
    pub audit_log_retention_days: i32,
    /// 扩展配置，尚未提升为独立字段的序列化设置，按原样存取
    pub settings: String,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 最后更新时间
    pub updated_at: DateTime<Utc>,
}

impl Default for GlobalSettings {
    /// 固定的默认值，时间戳在持久化之前为 Unix 纪元
    fn default() -> Self {
        Self {
            id: DEFAULT_GLOBAL_SETTINGS_ID.to_string(),
            maintenance_mode: false,
            maintenance_message: String::new(),
            max_users_per_organization: 1000,
            max_session_duration: 480, // 8 hours
            password_min_length: 8,
            require_mfa: false,
            allow_registration: true,
            email_verification_required: true,
            token_expiration_minutes: 60,
            audit_log_retention_days: 90,
            settings: "{}".to_string(),
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
        }
    }
}
