// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 全局设置服务（global_settings_service）：带读穿缓存的设置读取与经过校验的更新
pub mod global_settings_service;
