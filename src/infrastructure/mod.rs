// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 包含缓存、数据库、指标以及仓库实现等外部依赖的适配
pub mod cache;
pub mod database;
pub mod metrics;
pub mod repositories;
