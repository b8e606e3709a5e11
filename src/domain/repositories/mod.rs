// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 定义数据持久化与缓存的抽象接口，以及约束每次存储调用的查询上下文
pub mod global_settings_repository;
pub mod query_context;
pub mod settings_cache;
