// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::global_settings_repository::StoreError;
use sea_orm::DbErr;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// 查询上下文
///
/// 携带调用方的截止时间与取消令牌。仓库的每条语句都在该上下文中执行，
/// 上下文失效时正在进行的数据库调用会被丢弃并返回错误。
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    deadline: Option<Instant>,
    cancellation: CancellationToken,
}

impl QueryContext {
    /// 没有截止时间、永不取消的上下文
    pub fn background() -> Self {
        Self::default()
    }

    /// 从现在起经过 `timeout` 后到期的上下文
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// 在指定时刻到期的上下文
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancellation: CancellationToken::new(),
        }
    }

    /// 替换取消令牌，截止时间保持不变
    pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// 在上下文约束下执行一次存储调用
    ///
    /// # 参数
    ///
    /// * `operation` - 返回数据库结果的 future
    ///
    /// # 返回值
    ///
    /// * `Ok(T)` - 操作在截止时间前完成
    /// * `Err(StoreError)` - 数据库错误、已取消或已超时
    pub async fn run<F, T>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, DbErr>>,
    {
        if self.cancellation.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if deadline <= Instant::now() {
                return Err(StoreError::DeadlineExceeded);
            }
        }

        let bounded = async {
            match self.deadline {
                Some(deadline) => tokio::time::timeout_at(deadline, operation)
                    .await
                    .map_err(|_| StoreError::DeadlineExceeded)?
                    .map_err(StoreError::from),
                None => operation.await.map_err(StoreError::from),
            }
        };

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(StoreError::Cancelled),
            result = bounded => result,
        }
    }
}
