// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::MetricsSettings;
use metrics::describe_counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 注册全局设置相关的计数器说明
pub fn describe_metrics() {
    describe_counter!(
        "global_settings_reads_total",
        "Number of global settings fetches against the store"
    );
    describe_counter!(
        "global_settings_updates_total",
        "Number of successful global settings updates"
    );
    describe_counter!(
        "global_settings_defaults_created_total",
        "Number of times the default global settings row was inserted"
    );
    describe_counter!(
        "global_settings_cache_invalidation_failures_total",
        "Number of failed deletions of the global settings cache key"
    );
}

/// 初始化 Prometheus 导出器
///
/// 未启用时什么也不做，计数器调用落到空记录器上。
///
/// # 参数
///
/// * `settings` - 指标配置
///
/// # 返回值
///
/// * `Ok(())` - 导出器已安装或未启用
/// * `Err(anyhow::Error)` - 监听地址无法解析
pub fn init_metrics(settings: &MetricsSettings) -> anyhow::Result<()> {
    if !settings.enabled {
        info!("Metrics exporter disabled");
        return Ok(());
    }

    let addr: SocketAddr = settings.listen_addr.parse()?;

    // Address already in use is not fatal for the service itself
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return Ok(());
    }

    describe_metrics();
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
