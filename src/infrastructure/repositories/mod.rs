// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库实现模块
///
/// 提供领域仓库接口的数据库实现
pub mod global_settings_repo_impl;

#[cfg(test)]
mod global_settings_repo_impl_test;
